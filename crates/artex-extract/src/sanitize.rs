use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Join image-derived segments under `base`.
///
/// Each segment must be a single normal path component. Names that carry a
/// separator, a drive prefix, or a `.`/`..` are rejected rather than
/// normalized away, so the result always stays below `base`.
pub fn output_path<B: AsRef<Path>, S: AsRef<str>>(base: B, segments: &[S]) -> Result<PathBuf> {
    let base = base.as_ref();
    let mut resolved = base.to_path_buf();

    for segment in segments {
        let segment = segment.as_ref();
        if !is_single_component(segment) {
            return Err(Error::UnsafeSegment {
                segment: segment.to_string(),
                base: base.to_path_buf(),
            });
        }
        resolved.push(segment);
    }

    Ok(resolved)
}

fn is_single_component(segment: &str) -> bool {
    if segment.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_base_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/out/CHATGPT/Program_Data")
        } else {
            Path::new("/out/CHATGPT/Program_Data")
        }
    }

    #[test]
    fn joins_normal_segments() {
        let result = output_path(test_base_path(), &["CACHE_DATA", "f_0001"]).unwrap();
        assert_eq!(
            result.strip_prefix(test_base_path()).unwrap(),
            Path::new("CACHE_DATA/f_0001")
        );
    }

    #[test]
    fn empty_segments_yield_base() {
        let result = output_path::<_, &str>(test_base_path(), &[]).unwrap();
        assert_eq!(result, test_base_path());
    }

    #[test]
    fn parent_dir_rejected() {
        let result = output_path(test_base_path(), &["..", "etc"]);
        assert!(matches!(result, Err(Error::UnsafeSegment { .. })));
    }

    #[test]
    fn embedded_separator_rejected() {
        assert!(output_path(test_base_path(), &["a/../../b"]).is_err());
        assert!(output_path(test_base_path(), &["a\\b"]).is_err());
    }

    #[test]
    fn absolute_segment_rejected() {
        let absolute = if cfg!(windows) { "C:" } else { "/" };
        assert!(output_path(test_base_path(), &[absolute]).is_err());
    }

    #[test]
    fn spaces_and_dots_inside_names_are_fine() {
        let result = output_path(test_base_path(), &["LM Studio", "v1.2.json"]).unwrap();
        assert!(result.ends_with("LM Studio/v1.2.json"));
    }
}
