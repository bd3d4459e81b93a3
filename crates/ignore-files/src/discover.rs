use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};

use globwise_walk::{fs as walkfs, EngineOptions, FileKind, FileSystem};
use repo_root::Locator;
use tracing::{debug, trace, trace_span};

use crate::{Error, IgnoreFile, ResolveOptions};

/// Directories never searched for ignore files.
pub const SKIPPED_DIRS: &[&str] = &["**/node_modules", "**/bower_components"];

/// Ignore files found for a working directory, in evaluation order.
#[derive(Clone, Debug)]
pub struct Discovered {
	/// The directory rules are made relative to.
	pub root: PathBuf,

	/// Files from the repository root down, then by depth below the working directory.
	pub files: Vec<IgnoreFile>,
}

fn engine_options(options: &ResolveOptions) -> EngineOptions {
	EngineOptions {
		absolute: true,
		dot: true,
		deep: options.deep,
		follow_symbolic_links: options.follow_symbolic_links,
		suppress_errors: options.suppress_errors,
		fs: options.fs.clone(),
		..Default::default()
	}
}

fn skipped() -> Vec<String> {
	SKIPPED_DIRS.iter().map(|s| (*s).to_owned()).collect()
}

fn to_file(path: String) -> Option<IgnoreFile> {
	let path = PathBuf::from(path);
	let applies_in = path.parent()?.to_path_buf();
	Some(IgnoreFile { path, applies_in })
}

/// Existing ignore files named `name` in the directories from `root` down to `cwd`'s parent.
fn parent_files(fs: &dyn FileSystem, root: &Path, cwd: &Path, name: &str) -> Vec<IgnoreFile> {
	let mut dirs: Vec<&Path> = cwd
		.ancestors()
		.skip(1)
		.take_while(|dir| dir.starts_with(root))
		.collect();
	dirs.reverse();

	dirs.into_iter()
		.filter_map(|dir| {
			let path = dir.join(name);
			match fs.metadata(&path) {
				Ok(stats) if stats.kind == FileKind::File => Some(IgnoreFile {
					path,
					applies_in: dir.to_path_buf(),
				}),
				Ok(_) => None,
				Err(err) => {
					trace!(?path, %err, "no parent ignore file");
					None
				}
			}
		})
		.collect()
}

fn assemble(cwd: &Path, root: Option<PathBuf>, parents: Vec<IgnoreFile>, found: Vec<String>) -> Discovered {
	let root = if parents.is_empty() {
		cwd.to_path_buf()
	} else {
		root.unwrap_or_else(|| cwd.to_path_buf())
	};

	let mut files = parents;
	files.extend(found.into_iter().filter_map(to_file));
	files.sort_by_key(|file| file.applies_in.components().count());
	files.dedup_by(|a, b| a.path == b.path);

	debug!(?root, files = files.len(), "discovered ignore files");
	Discovered { root, files }
}

/// Finds ignore files matching `patterns` under the working directory, blocking.
///
/// With `parent_file_name` set and a repository root above the working directory, that file is
/// also looked for in every directory between the two.
pub fn discover_sync(patterns: &[String], options: &ResolveOptions) -> Result<Discovered, Error> {
	let _span = trace_span!("discover", cwd = ?options.cwd).entered();
	let found = globwise_walk::glob_sync(patterns, &skipped(), &options.cwd, &engine_options(options))?
		.into_iter()
		.map(|entry| entry.path)
		.collect();

	let (root, parents) = match &options.parent_file_name {
		Some(name) => {
			let root = Locator::new(options.fs.clone()).find_sync(&options.cwd);
			let parents = root
				.as_deref()
				.map(|root| parent_files(options.fs.as_ref(), root, &options.cwd, name))
				.unwrap_or_default();
			(root, parents)
		}
		None => (None, Vec::new()),
	};

	Ok(assemble(&options.cwd, root, parents, found))
}

/// Finds ignore files matching `patterns` under the working directory.
///
/// See [`discover_sync`] for details.
pub async fn discover(patterns: &[String], options: &ResolveOptions) -> Result<Discovered, Error> {
	let found = globwise_walk::glob(patterns, &skipped(), &options.cwd, &engine_options(options))
		.await?
		.into_iter()
		.map(|entry| entry.path)
		.collect();

	let (root, parents) = match &options.parent_file_name {
		Some(name) => {
			let root = Locator::new(options.fs.clone()).find(&options.cwd).await;
			let parents = match root.clone() {
				Some(root) => {
					let cwd = options.cwd.clone();
					let name = name.clone();
					walkfs::blocking(&options.fs, move |fs| {
						Ok(parent_files(fs, &root, &cwd, &name))
					})
					.await
					.unwrap_or_else(|err| {
						debug!(%err, "parent ignore file scan failed");
						Vec::new()
					})
				}
				None => Vec::new(),
			};
			(root, parents)
		}
		None => (None, Vec::new()),
	};

	Ok(assemble(&options.cwd, root, parents, found))
}

fn read_one(fs: &dyn FileSystem, file: &IgnoreFile, suppress: bool) -> Result<Option<String>, Error> {
	match fs.read_to_string(&file.path) {
		Ok(content) => Ok(Some(content)),
		Err(err) if err.kind() == ErrorKind::NotFound => {
			trace!(?file, "ignore file vanished");
			Ok(None)
		}
		Err(err) if suppress => {
			debug!(?file, %err, "suppressed ignore file read error");
			Ok(None)
		}
		Err(err) => Err(Error::Read {
			file: file.path.clone(),
			err,
		}),
	}
}

/// Reads discovered files, blocking. Missing files are skipped.
pub fn read_sync(
	fs: &dyn FileSystem,
	files: Vec<IgnoreFile>,
	suppress: bool,
) -> Result<Vec<(IgnoreFile, String)>, Error> {
	let mut contents = Vec::with_capacity(files.len());
	for file in files {
		if let Some(content) = read_one(fs, &file, suppress)? {
			contents.push((file, content));
		}
	}
	Ok(contents)
}

/// Reads discovered files concurrently, keeping their order. Missing files are skipped.
pub async fn read(
	fs: &walkfs::SharedFileSystem,
	files: Vec<IgnoreFile>,
	suppress: bool,
) -> Result<Vec<(IgnoreFile, String)>, Error> {
	trace!(files = files.len(), "loading file contents");
	let reads = files.into_iter().map(|file| async move {
		let path = file.path.clone();
		let content = walkfs::blocking(fs, {
			let file = file.clone();
			move |fs| Ok(read_one(fs, &file, suppress))
		})
		.await
		.map_err(|err| Error::Read { file: path, err })??;
		Ok::<_, Error>(content.map(|content| (file, content)))
	});

	Ok(futures::future::try_join_all(reads)
		.await?
		.into_iter()
		.flatten()
		.collect())
}
