#![allow(clippy::unwrap_used)]
use anyhow::Result;
use clap::ValueEnum;
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use platform_shims::cli_args_command;
use std::{env, fs, path::PathBuf};

fn main() -> Result<()> {
    const NAME: &str = "platform-shims";
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let target = out.ancestors().nth(3).unwrap().to_owned();
    let mut cmd = cli_args_command().name(NAME);

    for &shell in Shell::value_variants() {
        generate_to(shell, &mut cmd, NAME, &out)?;
    }

    // one page for the command and one per subcommand
    let mut buf = Vec::new();
    Man::new(cmd.clone()).render(&mut buf)?;
    fs::write(out.join(format!("{NAME}.1")), &buf)?;
    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        let name = format!("{NAME}-{}", sub.get_name());
        let mut buf = Vec::new();
        Man::new(sub.clone().name(name.clone())).render(&mut buf)?;
        fs::write(out.join(format!("{name}.1")), &buf)?;
    }

    for file in fs::read_dir(&out)? {
        let f = file?.path();
        if f.is_file() {
            fs::rename(&f, target.join(f.file_name().unwrap()))?;
        }
    }

    Ok(())
}
