/*  ntp_metrics.rs -- New tab page metrics
    This file is part of <https://github.com/mahor1221/platform-shims>.
    Copyright (C) 2024 Mahor Foruzesh <mahor1221@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use tracing::info;

pub const ACTION_ON_NTP_HISTOGRAM: &str = "IOS.ContentSuggestions.ActionOnNTP";

/// Actions on the new tab page reported back to the metrics recorder
pub trait NewTabPageMetricsDelegate {
    /// The recent tab tile has been tapped
    fn recent_tab_tile_opened(&mut self);
    /// A feed article has been tapped
    fn feed_article_opened(&mut self);
    /// A most visited tile has been tapped
    fn most_visited_tile_opened(&mut self);
    /// A shortcut tile has been tapped
    fn shortcut_tile_opened(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewTabPageAction {
    RecentTabTile = 0,
    FeedArticle = 1,
    MostVisitedTile = 2,
    ShortcutTile = 3,
}

impl NewTabPageAction {
    pub const ALL: [Self; 4] = [
        Self::RecentTabTile,
        Self::FeedArticle,
        Self::MostVisitedTile,
        Self::ShortcutTile,
    ];

    /// Forward this action to the matching delegate method
    pub fn notify(self, delegate: &mut impl NewTabPageMetricsDelegate) {
        match self {
            Self::RecentTabTile => delegate.recent_tab_tile_opened(),
            Self::FeedArticle => delegate.feed_article_opened(),
            Self::MostVisitedTile => delegate.most_visited_tile_opened(),
            Self::ShortcutTile => delegate.shortcut_tile_opened(),
        }
    }
}

/// Counts every action it is notified of
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTabPageMetricsRecorder {
    counts: [u32; NewTabPageAction::ALL.len()],
}

impl NewTabPageMetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, action: NewTabPageAction) -> u32 {
        self.counts[action as usize]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    fn record(&mut self, action: NewTabPageAction) {
        let n = &mut self.counts[action as usize];
        *n = n.saturating_add(1);
        info!("{ACTION_ON_NTP_HISTOGRAM}: {action}");
    }
}

impl NewTabPageMetricsDelegate for NewTabPageMetricsRecorder {
    fn recent_tab_tile_opened(&mut self) {
        self.record(NewTabPageAction::RecentTabTile)
    }

    fn feed_article_opened(&mut self) {
        self.record(NewTabPageAction::FeedArticle)
    }

    fn most_visited_tile_opened(&mut self) {
        self.record(NewTabPageAction::MostVisitedTile)
    }

    fn shortcut_tile_opened(&mut self) {
        self.record(NewTabPageAction::ShortcutTile)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn recorder_counts_each_action() {
        let mut r = NewTabPageMetricsRecorder::new();
        r.recent_tab_tile_opened();
        r.feed_article_opened();
        r.feed_article_opened();
        r.shortcut_tile_opened();

        assert_eq!(r.count(NewTabPageAction::RecentTabTile), 1);
        assert_eq!(r.count(NewTabPageAction::FeedArticle), 2);
        assert_eq!(r.count(NewTabPageAction::MostVisitedTile), 0);
        assert_eq!(r.count(NewTabPageAction::ShortcutTile), 1);
        assert_eq!(r.total(), 4);
    }

    #[test]
    fn notify_calls_matching_method() {
        #[derive(Default)]
        struct Calls(Vec<&'static str>);
        impl NewTabPageMetricsDelegate for Calls {
            fn recent_tab_tile_opened(&mut self) {
                self.0.push("recent")
            }
            fn feed_article_opened(&mut self) {
                self.0.push("feed")
            }
            fn most_visited_tile_opened(&mut self) {
                self.0.push("most-visited")
            }
            fn shortcut_tile_opened(&mut self) {
                self.0.push("shortcut")
            }
        }

        let mut calls = Calls::default();
        for a in NewTabPageAction::ALL {
            a.notify(&mut calls);
        }
        assert_eq!(calls.0, ["recent", "feed", "most-visited", "shortcut"]);
    }

    #[test]
    fn recorder_summary() {
        let mut r = NewTabPageMetricsRecorder::new();
        NewTabPageAction::MostVisitedTile.notify(&mut r);
        NewTabPageAction::MostVisitedTile.notify(&mut r);
        NewTabPageAction::RecentTabTile.notify(&mut r);
        assert_snapshot!(r.to_string(), @r###"
        Recent tab tile   : 1
        Feed article      : 0
        Most visited tile : 2
        Shortcut tile     : 0
        Total             : 3
        "###);
    }
}
