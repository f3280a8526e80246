//! Shell completions and man pages are written next to the build artifacts
//! by the build script of this package.

fn main() {}
