/// Options applied while markup is turned into the cursor's token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Drop text made only of spaces, tabs and newlines
    pub skip_whitespace_only_text: bool,
    /// Lower-case tag and attribute names
    pub lowercase_names: bool,
    /// Close HTML void elements (`br`, `img`, ...) right after they open
    pub close_void_elements: bool,
    /// Decode predefined entities and character references in text and attribute values
    pub decode_references: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_whitespace_only_text: false,
            lowercase_names: true,
            close_void_elements: true,
            decode_references: false,
        }
    }
}

impl Config {
    pub fn with_skip_whitespace_only_text(mut self, skip: bool) -> Self {
        self.skip_whitespace_only_text = skip;
        self
    }

    pub fn with_lowercase_names(mut self, lowercase: bool) -> Self {
        self.lowercase_names = lowercase;
        self
    }

    pub fn with_close_void_elements(mut self, close: bool) -> Self {
        self.close_void_elements = close;
        self
    }

    pub fn with_decode_references(mut self, decode: bool) -> Self {
        self.decode_references = decode;
        self
    }
}
