//! Input sanitization for stripping terminal control sequences.
//!
//! Without a line editor, arrow keys and similar reach us as raw escape
//! sequences inside the line. They are removed before tokenizing.

use vte::{Params, Parser, Perform};

/// Input sanitizer using the VTE parser.
pub struct InputSanitizer;

impl InputSanitizer {
    /// Strip escape sequences and control characters from raw bytes.
    ///
    /// Tabs are kept, since they separate tokens.
    pub fn clean(input: &[u8]) -> String {
        let mut extractor = PlainTextExtractor::new();
        let mut parser = Parser::new();

        parser.advance(&mut extractor, input);

        extractor.into_string()
    }

    /// Strip escape sequences and control characters from a string.
    pub fn clean_str(input: &str) -> String {
        Self::clean(input.as_bytes())
    }
}

/// VTE performer that keeps printable text.
struct PlainTextExtractor {
    output: String,
}

impl PlainTextExtractor {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn into_string(self) -> String {
        self.output
    }
}

impl Perform for PlainTextExtractor {
    fn print(&mut self, c: char) {
        self.output.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if byte == b'\t' {
            self.output.push('\t');
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(
        &mut self,
        _params: &Params,
        _intermediates: &[u8],
        _ignore: bool,
        _action: char,
    ) {
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}
