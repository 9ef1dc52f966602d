use std::borrow::Cow;
use std::path::Path;

use encoding_rs::GBK;

use crate::error::Result;
use crate::error::SelectorError;

/// Reads one entry per non-blank line, trimmed.
///
/// The file is decoded as UTF-8 first and as GBK if that fails. A leading
/// UTF-8 byte order mark is dropped, so it never ends up in the first word.
pub fn load_word_list(path: &str) -> Result<Vec<String>> {
    if path.is_empty() {
        return Err(SelectorError::MissingWordListPath);
    }
    let path = Path::new(path);
    let bytes = std::fs::read(path).map_err(|source| SelectorError::WordListRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_word_list(&bytes).ok_or_else(|| SelectorError::WordListDecode {
        path: path.to_path_buf(),
    })?;
    Ok(split_words(&text))
}

fn decode_word_list(bytes: &[u8]) -> Option<Cow<'_, str>> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text))),
        Err(_) => GBK.decode_without_bom_handling_and_without_replacement(bytes),
    }
}

fn split_words(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
