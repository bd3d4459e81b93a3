use std::{env::args, path::PathBuf};

use repo_root::Locator;

// Run with: `cargo run --example find-root [PATH]`
#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();

	let path = PathBuf::from(args().nth(1).unwrap_or_else(|| ".".to_string()));
	match Locator::default().find(&path).await {
		Some(root) => println!("{}", root.display()),
		None => eprintln!("not in a repository"),
	}
}
