//! STAR text parser.
//!
//! Handles data blocks, loops, unquoted / quoted / semicolon-delimited values and
//! `#` comments. RELION's `#1`-style column indices after loop tags are comments and
//! are dropped. Save frames are accepted but their contents are discarded, since
//! particle tables never use them.

use super::dom::{DataBlock, Loop, StarDocument, Value};
use super::StarError;
use tracing::debug;

/// Parses STAR text into a [`StarDocument`].
pub fn parse(input: &str) -> Result<StarDocument, StarError> {
    Parser::new(input).parse_document()
}

#[derive(Debug)]
enum Token {
    Block(String),
    LoopStart,
    SaveStart,
    SaveEnd,
    Tag(String),
    Val(Value),
    Eof,
}

struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn at_column_zero(&self) -> bool {
        self.pos == 0 || self.bytes[self.pos - 1] == b'\n'
    }

    fn skip_trivia(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                }
                b'#' => {
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, StarError> {
        self.skip_trivia();
        let Some(&b) = self.bytes.get(self.pos) else {
            return Ok(Token::Eof);
        };

        if b == b';' && self.at_column_zero() {
            return self.text_field();
        }
        if b == b'\'' || b == b'"' {
            return self.quoted(b);
        }

        let start = self.pos;
        while let Some(&c) = self.bytes.get(self.pos) {
            if c.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        Ok(classify_bare_word(&self.input[start..self.pos]))
    }

    // A closing quote only counts when followed by whitespace or end of input,
    // so `'it's'` reads as `it's`. Quoted values never span lines.
    fn quoted(&mut self, quote: u8) -> Result<Token, StarError> {
        let line = self.line;
        let content_start = self.pos + 1;
        let mut i = content_start;
        while let Some(&c) = self.bytes.get(i) {
            if c == b'\n' {
                break;
            }
            if c == quote
                && self
                    .bytes
                    .get(i + 1)
                    .is_none_or(|next| next.is_ascii_whitespace())
            {
                self.pos = i + 1;
                return Ok(Token::Val(Value::Str(
                    self.input[content_start..i].to_string(),
                )));
            }
            i += 1;
        }
        Err(StarError::UnterminatedQuote { line })
    }

    fn text_field(&mut self) -> Result<Token, StarError> {
        let line = self.line;
        let content_start = self.pos + 1;
        let mut i = content_start;
        loop {
            while i < self.bytes.len() && self.bytes[i] != b'\n' {
                i += 1;
            }
            if i >= self.bytes.len() {
                return Err(StarError::UnterminatedTextField { line });
            }
            i += 1;
            self.line += 1;
            if self.bytes.get(i) == Some(&b';') {
                let text = self.input[content_start..i - 1].to_string();
                self.pos = i + 1;
                return Ok(Token::Val(Value::Str(text)));
            }
        }
    }
}

fn classify_bare_word(word: &str) -> Token {
    let lower = word.to_ascii_lowercase();
    if let Some(name) = lower.strip_prefix("data_") {
        Token::Block(word[word.len() - name.len()..].to_string())
    } else if lower == "loop_" {
        Token::LoopStart
    } else if lower == "save_" {
        Token::SaveEnd
    } else if lower.starts_with("save_") {
        Token::SaveStart
    } else if word.starts_with('_') {
        Token::Tag(word.to_string())
    } else if word == "." {
        Token::Val(Value::Inapplicable)
    } else if word == "?" {
        Token::Val(Value::Unknown)
    } else {
        Token::Val(Value::Str(word.to_string()))
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    pending: Option<Token>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            pending: None,
        }
    }

    fn next(&mut self) -> Result<Token, StarError> {
        match self.pending.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn push_back(&mut self, token: Token) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(token);
    }

    fn parse_document(&mut self) -> Result<StarDocument, StarError> {
        let mut blocks = Vec::new();
        loop {
            match self.next()? {
                Token::Eof => break,
                Token::Block(name) => blocks.push(self.parse_block(name)?),
                other => debug!(
                    "Ignoring {:?} before the first data block (line {}).",
                    other, self.lexer.line
                ),
            }
        }
        Ok(StarDocument { blocks })
    }

    fn parse_block(&mut self, name: String) -> Result<DataBlock, StarError> {
        let mut block = DataBlock {
            name,
            ..Default::default()
        };

        loop {
            match self.next()? {
                token @ (Token::Eof | Token::Block(_)) => {
                    self.push_back(token);
                    break;
                }
                Token::LoopStart => {
                    let lp = self.parse_loop(&block.name)?;
                    block.loops.push(lp);
                }
                Token::SaveStart => self.skip_save_frame()?,
                Token::SaveEnd => {}
                Token::Tag(tag) => match self.next()? {
                    Token::Val(value) => block.pairs.push((tag, value)),
                    other => {
                        debug!("Tag '{}' in block '{}' has no value.", tag, block.name);
                        self.push_back(other);
                    }
                },
                Token::Val(_) => {}
            }
        }
        Ok(block)
    }

    fn parse_loop(&mut self, block: &str) -> Result<Loop, StarError> {
        let header_line = self.lexer.line;
        let mut lp = Loop::default();

        loop {
            match self.next()? {
                Token::Tag(tag) => lp.tags.push(tag),
                other => {
                    self.push_back(other);
                    break;
                }
            }
        }
        if lp.tags.is_empty() {
            return Err(StarError::EmptyLoopHeader {
                block: block.to_string(),
                line: header_line,
            });
        }

        loop {
            match self.next()? {
                Token::Val(value) => lp.values.push(value),
                other => {
                    self.push_back(other);
                    break;
                }
            }
        }
        if lp.values.len() % lp.tags.len() != 0 {
            return Err(StarError::RaggedLoop {
                block: block.to_string(),
                columns: lp.tags.len(),
                values: lp.values.len(),
            });
        }
        Ok(lp)
    }

    fn skip_save_frame(&mut self) -> Result<(), StarError> {
        loop {
            match self.next()? {
                Token::SaveEnd => return Ok(()),
                token @ (Token::Eof | Token::Block(_)) => {
                    self.push_back(token);
                    return Ok(());
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::Str(v.to_string())
    }

    #[test]
    fn relion_particle_table_with_column_indices() {
        let input = "\
# version 50001

data_particles

loop_
_rlnTomoName #1
_rlnCenteredCoordinateXAngst #2
_rlnCenteredCoordinateYAngst #3
_rlnCenteredCoordinateZAngst #4
_rlnTomoTiltSeriesPixelSize #5
TS_01   0.000000   0.000000   0.000000 2.000000
TS_01 100.000000 -50.000000  25.000000 2.000000
";
        let doc = parse(input).unwrap();
        assert_eq!(doc.blocks.len(), 1);
        let block = &doc.blocks[0];
        assert_eq!(block.name, "particles");
        let lp = &block.loops[0];
        assert_eq!(lp.tags.len(), 5);
        assert_eq!(lp.tags[4], "_rlnTomoTiltSeriesPixelSize");
        assert_eq!(lp.nrows(), 2);
        assert_eq!(lp.values[6], s("100.000000"));
    }

    #[test]
    fn multiple_blocks_keep_declaration_order() {
        let input = "data_general\n_rlnTomoSubTomosAre2DStacks 1\n\
                     data_particles\nloop_\n_rlnTomoName\nTS_01\nTS_02\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.block_names().collect::<Vec<_>>(), ["general", "particles"]);
        assert_eq!(
            doc.blocks[0].get("_rlnTomoSubTomosAre2DStacks"),
            Some(&s("1"))
        );
        assert_eq!(doc.blocks[1].loops[0].nrows(), 2);
    }

    #[test]
    fn empty_block_name_is_allowed() {
        let doc = parse("data_\nloop_\n_a\n1\n").unwrap();
        assert_eq!(doc.blocks[0].name, "");
        assert_eq!(doc.blocks[0].loops[0].nrows(), 1);
    }

    #[test]
    fn block_name_keeps_original_case() {
        let doc = parse("DATA_Particles\n_a 1\n").unwrap();
        assert_eq!(doc.blocks[0].name, "Particles");
    }

    #[test]
    fn quoted_values_may_contain_spaces_and_inner_quotes() {
        let input = "data_t\n_a 'two words'\n_b \"it's fine\"\n_c 'it's'\n";
        let doc = parse(input).unwrap();
        let block = &doc.blocks[0];
        assert_eq!(block.get("_a"), Some(&s("two words")));
        assert_eq!(block.get("_b"), Some(&s("it's fine")));
        assert_eq!(block.get("_c"), Some(&s("it's")));
    }

    #[test]
    fn semicolon_text_field_spans_lines() {
        let input = "data_t\n_note\n;first line\nsecond line\n;\n_after 1\n";
        let doc = parse(input).unwrap();
        let block = &doc.blocks[0];
        assert_eq!(block.get("_note"), Some(&s("first line\nsecond line")));
        assert_eq!(block.get("_after"), Some(&s("1")));
    }

    #[test]
    fn null_markers_are_recognized() {
        let doc = parse("data_t\nloop_\n_a\n_b\n1 .\n? 2\n").unwrap();
        let lp = &doc.blocks[0].loops[0];
        assert_eq!(lp.values, vec![s("1"), Value::Inapplicable, Value::Unknown, s("2")]);
    }

    #[test]
    fn comments_and_preamble_are_ignored() {
        let doc = parse("# header\nstray\ndata_t\n_a 1 # trailing\n").unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].get("_a"), Some(&s("1")));
    }

    #[test]
    fn save_frames_are_skipped() {
        let doc = parse("data_t\nsave_frame\n_inner 1\nsave_\n_outer 2\n").unwrap();
        let block = &doc.blocks[0];
        assert!(block.get("_inner").is_none());
        assert_eq!(block.get("_outer"), Some(&s("2")));
    }

    #[test]
    fn empty_input_has_no_blocks() {
        assert!(parse("").unwrap().blocks.is_empty());
        assert!(parse("# only a comment\n").unwrap().blocks.is_empty());
    }

    #[test]
    fn ragged_loop_is_an_error() {
        let err = parse("data_p\nloop_\n_a\n_b\n1 2\n3\n").unwrap_err();
        assert!(matches!(
            err,
            StarError::RaggedLoop { ref block, columns: 2, values: 3 } if block == "p"
        ));
    }

    #[test]
    fn loop_without_tags_is_an_error() {
        let err = parse("data_p\nloop_\n1 2\n").unwrap_err();
        assert!(matches!(err, StarError::EmptyLoopHeader { line: 2, .. }));
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let err = parse("data_t\n_a 'open\n").unwrap_err();
        assert!(matches!(err, StarError::UnterminatedQuote { line: 2 }));
    }

    #[test]
    fn unterminated_text_field_reports_start_line() {
        let err = parse("data_t\n_a\n;never closed\nmore\n").unwrap_err();
        assert!(matches!(err, StarError::UnterminatedTextField { line: 3 }));
    }
}
