//! Naming of downloaded files
use regex::Regex;
use std::sync::OnceLock;

static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();

/// Build the filename a material is saved as.
/// Anything other than letters, digits, spaces, `_` and `-` is dropped from the title.
/// The extension is kept as is.
pub fn download_filename(title: &str, extension: &str) -> String {
    let unsafe_re = UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^a-zA-Z0-9 _-]").unwrap());
    format!("{}.{}", unsafe_re.replace_all(title, ""), extension)
}

#[cfg(test)]
mod tests {
    use super::download_filename;

    #[test]
    fn strips_punctuation() {
        assert_eq!(
            download_filename("Intro: Data/Structures!", "pdf"),
            "Intro Data Structures.pdf"
        );
    }

    #[test]
    fn keeps_allowed_characters() {
        assert_eq!(
            download_filename("week_1 - notes", "docx"),
            "week_1 - notes.docx"
        );
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(download_filename("Café résumé", "txt"), "Caf rsum.txt");
    }

    #[test]
    fn repeated_calls_agree() {
        for _ in 0..3 {
            assert_eq!(download_filename("Notes #2", "pdf"), "Notes 2.pdf");
        }
    }

    #[test]
    fn extension_is_verbatim() {
        assert_eq!(download_filename("a", "tar.gz"), "a.tar.gz");
    }
}
