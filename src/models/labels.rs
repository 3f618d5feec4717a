use std::fmt;

/// Page layout of the generated label PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelFormat {
    A5,
    #[default]
    A6,
    /// Four A6 labels on one page.
    A6x4,
    A7,
    /// Eight A7 labels on one page.
    A7x8,
}

impl LabelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelFormat::A5 => "A5",
            LabelFormat::A6 => "A6",
            LabelFormat::A6x4 => "A6-4",
            LabelFormat::A7 => "A7",
            LabelFormat::A7x8 => "A7-8",
        }
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
