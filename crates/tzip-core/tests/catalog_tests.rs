use std::fs;

use tempfile::TempDir;
use tzip_core::{FileCatalog, FileEntry, TzipError};

fn names(catalog: &FileCatalog) -> Vec<String> {
    catalog.entries().iter().map(FileEntry::to_string).collect()
}

#[test]
fn keeps_only_txt_files_in_sorted_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    for name in ["c.txt", "a.txt", "notes.md", "b.txt", "archive.txt.gz", "README"] {
        fs::write(dir.path().join(name), name.as_bytes())?;
    }

    let catalog = FileCatalog::scan(dir.path(), ".txt")?;

    assert_eq!(names(&catalog), ["a.txt", "b.txt", "c.txt"]);
    assert_eq!(catalog.root(), dir.path());
    assert_eq!(catalog.path_of(1), Some(dir.path().join("b.txt")));
    Ok(())
}

#[test]
fn suffix_match_is_case_sensitive() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    for name in ["upper.TXT", "mixed.Txt", "lower.txt", "txt", "dottxt"] {
        fs::write(dir.path().join(name), b"x")?;
    }

    let catalog = FileCatalog::scan(dir.path(), ".txt")?;

    assert_eq!(names(&catalog), ["lower.txt"]);
    Ok(())
}

#[test]
fn skips_subdirectories_and_does_not_recurse() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("folder.txt"))?;
    fs::create_dir(dir.path().join("nested"))?;
    fs::write(dir.path().join("nested").join("inner.txt"), b"inner")?;
    fs::write(dir.path().join("top.txt"), b"top")?;

    let catalog = FileCatalog::scan(dir.path(), ".txt")?;

    assert_eq!(names(&catalog), ["top.txt"]);
    Ok(())
}

#[test]
fn ordering_is_bytewise_and_repeatable() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    for name in ["b.txt", "B.txt", "10.txt", "9.txt", "a b.txt", ".txt"] {
        fs::write(dir.path().join(name), b"x")?;
    }

    let first = FileCatalog::scan(dir.path(), ".txt")?;
    let second = FileCatalog::scan(dir.path(), ".txt")?;

    assert_eq!(names(&first), [".txt", "10.txt", "9.txt", "B.txt", "a b.txt", "b.txt"]);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn empty_directory_yields_empty_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;

    let catalog = FileCatalog::scan(dir.path(), ".txt")?;

    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
    Ok(())
}

#[test]
fn missing_directory_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("does-not-exist");

    let err = FileCatalog::scan(&missing, ".txt").unwrap_err();

    match err {
        TzipError::DirectoryUnavailable { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn regular_file_root_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"not a directory")?;

    let err = FileCatalog::scan(&file, ".txt").unwrap_err();

    assert!(matches!(err, TzipError::DirectoryUnavailable { .. }), "{err:?}");
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinks_to_files_are_kept_and_dangling_ones_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let outside = TempDir::new()?;
    let target = outside.path().join("target.txt");
    fs::write(&target, b"linked")?;

    std::os::unix::fs::symlink(&target, dir.path().join("link.txt"))?;
    std::os::unix::fs::symlink(outside.path().join("gone.txt"), dir.path().join("dangling.txt"))?;

    let catalog = FileCatalog::scan(dir.path(), ".txt")?;

    assert_eq!(names(&catalog), ["link.txt"]);
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_names_are_catalogued_in_byte_order() -> Result<(), Box<dyn std::error::Error>> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new()?;
    let latin1 = OsStr::from_bytes(b"caf\xe9.txt");
    fs::write(dir.path().join("a.txt"), b"first")?;
    fs::write(dir.path().join(latin1), b"latin-1 name")?;
    fs::write(dir.path().join("cafe.txt"), b"ascii name")?;
    fs::write(dir.path().join(OsStr::from_bytes(b"caf\xe9.md")), b"other suffix")?;

    let catalog = FileCatalog::scan(dir.path(), ".txt")?;

    let raw: Vec<&[u8]> = catalog.entries().iter().map(FileEntry::name_bytes).collect();
    assert_eq!(raw, [&b"a.txt"[..], b"cafe.txt", b"caf\xe9.txt"]);
    assert_eq!(catalog.path_of(2), Some(dir.path().join(latin1)));
    assert_eq!(fs::read(catalog.path_of(2).expect("entry"))?, b"latin-1 name");
    Ok(())
}
