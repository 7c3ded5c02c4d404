//! Which files get an outline
//!
//! Only C# and Java sources are outlined; everything else is `PlainText`.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    CSharp,
    Java,
}

const EXTENSIONS: &[(&str, LanguageId)] = &[
    ("cs", LanguageId::CSharp),
    ("csx", LanguageId::CSharp),
    ("java", LanguageId::Java),
];

impl LanguageId {
    /// Case-insensitive; unknown extensions are `PlainText`
    pub fn from_extension(ext: &str) -> Self {
        EXTENSIONS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(ext))
            .map_or(LanguageId::PlainText, |&(_, language)| language)
    }

    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => LanguageId::PlainText,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::CSharp => "C#",
            LanguageId::Java => "Java",
            LanguageId::PlainText => "Plain Text",
        }
    }

    pub fn has_outline(&self) -> bool {
        *self != LanguageId::PlainText
    }
}
