use chrono::{DateTime, Local};
use std::fs::{self, File, FileTimes};
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileInfo {
    pub name: String,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub modified: SystemTime,
}

impl LocalFileInfo {
    /// One `ls -l` line.
    pub fn long_line(&self) -> String {
        format!(
            "{} {:>3} {:>5} {:>5} {:>10} {} {}",
            format_mode(self.mode),
            self.nlink,
            self.uid,
            self.gid,
            self.size,
            format_mtime(self.modified),
            self.name
        )
    }
}

/// Names in `dir`, sorted. Dotfiles are skipped unless `include_hidden`.
pub fn local_list(dir: &Path, include_hidden: bool) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if include_hidden || !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Metadata for `path`, following symlinks unless the link is dangling.
pub fn local_stat(path: &Path) -> io::Result<LocalFileInfo> {
    let metadata = fs::metadata(path).or_else(|_| fs::symlink_metadata(path))?;
    let name = path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |n| n.to_string_lossy().into_owned(),
    );

    Ok(LocalFileInfo {
        name,
        mode: metadata.mode(),
        nlink: metadata.nlink(),
        uid: metadata.uid(),
        gid: metadata.gid(),
        size: metadata.len(),
        modified: metadata.modified()?,
    })
}

/// Render a `st_mode` as `drwxr-xr-x`.
pub fn format_mode(mode: u32) -> String {
    let kind = match mode & 0o170000 {
        0o040000 => 'd',
        0o120000 => 'l',
        0o010000 => 'p',
        0o140000 => 's',
        0o020000 => 'c',
        0o060000 => 'b',
        _ => '-',
    };

    let triplet = |read: u32, write: u32, exec: u32, special: u32, set: char, unset: char| {
        [
            if mode & read != 0 { 'r' } else { '-' },
            if mode & write != 0 { 'w' } else { '-' },
            match (mode & exec != 0, mode & special != 0) {
                (true, true) => set,
                (false, true) => unset,
                (true, false) => 'x',
                (false, false) => '-',
            },
        ]
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    out.extend(triplet(0o400, 0o200, 0o100, 0o4000, 's', 'S'));
    out.extend(triplet(0o040, 0o020, 0o010, 0o2000, 's', 'S'));
    out.extend(triplet(0o004, 0o002, 0o001, 0o1000, 't', 'T'));
    out
}

/// Local time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_mtime(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Copy a regular file, keeping its permission bits and timestamps.
pub fn local_copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst)?;
    let metadata = fs::metadata(src)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    File::open(dst)?.set_times(times)
}

/// Copy a directory tree into `dst`, which must not exist yet.
///
/// The whole source tree is listed before anything is created, so a `dst`
/// inside `src` never shows up in its own copy.
pub fn local_copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    let entries = WalkDir::new(src)
        .follow_links(true)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let mut created = Vec::new();
    for entry in &entries {
        let relative = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir(&target)?;
            created.push((entry.path(), target));
        } else {
            local_copy_file(entry.path(), &target)?;
        }
    }

    // Deepest first, after the contents: a read-only directory must still be fillable.
    for (from, to) in created.into_iter().rev() {
        fs::set_permissions(&to, fs::metadata(from)?.permissions())?;
    }
    Ok(())
}

/// Create an empty file, or bump the modified time of an existing one.
pub fn local_touch(path: &Path) -> io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    file.set_modified(SystemTime::now())
}
