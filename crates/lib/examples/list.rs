use std::env::args;

use futures::TryStreamExt;
use globwise::{glob_stream, Options};
use miette::Result;

// Run with: `cargo run --example list -- 'src/**/*.rs' '!**/tests/**'`
#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt::init();

	let patterns: Vec<String> = args().skip(1).collect();
	let options = Options::default().gitignore(true);

	let mut paths = Box::pin(glob_stream(patterns, &options)?);
	while let Some(path) = paths.try_next().await? {
		println!("{path}");
	}

	Ok(())
}
