//! CIF text parser.
//!
//! Handles unquoted, single/double-quoted and semicolon text field values,
//! `loop_`, save frames, `global_` and `stop_`. Values are stored verbatim.

use crate::dom::{Block, Document, Item, Loop};
use crate::error::{CifError, Result};

/// Parse CIF text into a [`Document`].
pub fn parse(input: &str) -> Result<Document> {
    Parser::new(input).parse_document()
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    DataBlock(String),
    LoopStart,
    Global,
    Stop,
    SaveStart(String),
    SaveEnd,
    Tag(String),
    Value(String),
    Eof,
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    pending: Option<(Token, usize)>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            pending: None,
        }
    }

    /// Next token and the line it starts on.
    fn next(&mut self) -> Result<(Token, usize)> {
        if let Some(pending) = self.pending.take() {
            return Ok(pending);
        }
        self.scan_token()
    }

    fn push_back(&mut self, token: Token, line: usize) {
        debug_assert!(self.pending.is_none());
        self.pending = Some((token, line));
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.bytes[self.pos - 1] == b'\n'
    }

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
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

    fn scan_token(&mut self) -> Result<(Token, usize)> {
        self.skip_whitespace_and_comments();
        let line = self.line;
        if self.pos >= self.bytes.len() {
            return Ok((Token::Eof, line));
        }
        let token = match self.bytes[self.pos] {
            b';' if self.at_line_start() => self.scan_text_field()?,
            quote @ (b'\'' | b'"') => self.scan_quoted(quote)?,
            _ => {
                let start = self.pos;
                while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
                    self.pos += 1;
                }
                classify_unquoted(&self.input[start..self.pos])
            }
        };
        Ok((token, line))
    }

    fn scan_quoted(&mut self, quote: u8) -> Result<Token> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.bytes.get(self.pos) {
                None | Some(b'\n') => {
                    return Err(CifError::UnterminatedQuote { line: self.line });
                }
                Some(&b) if b == quote => {
                    let closes = self
                        .bytes
                        .get(self.pos + 1)
                        .is_none_or(|next| next.is_ascii_whitespace());
                    self.pos += 1;
                    if closes {
                        return Ok(Token::Value(self.input[start..self.pos].to_string()));
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn scan_text_field(&mut self) -> Result<Token> {
        let start = self.pos;
        let start_line = self.line;
        self.pos += 1;
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                self.pos += 1;
            }
            if self.pos >= self.bytes.len() {
                return Err(CifError::UnterminatedTextField { line: start_line });
            }
            self.pos += 1;
            self.line += 1;
            if self.bytes.get(self.pos) == Some(&b';') {
                self.pos += 1;
                return Ok(Token::Value(self.input[start..self.pos].to_string()));
            }
        }
    }

    fn parse_document(&mut self) -> Result<Document> {
        let mut blocks = Vec::new();
        loop {
            match self.next()? {
                (Token::Eof, _) => break,
                (Token::DataBlock(name), _) => blocks.push(self.parse_block(name, false)?),
                (Token::Global, _) => {}
                (_, line) => return Err(CifError::OutsideBlock { line }),
            }
        }
        Ok(Document { blocks })
    }

    fn parse_block(&mut self, name: String, in_frame: bool) -> Result<Block> {
        let mut block = Block::new(name);
        loop {
            let (token, line) = self.next()?;
            match token {
                Token::Eof | Token::DataBlock(_) | Token::Global => {
                    self.push_back(token, line);
                    break;
                }
                Token::SaveEnd => {
                    if in_frame {
                        break;
                    }
                }
                Token::SaveStart(frame) => {
                    let frame = self.parse_block(frame, true)?;
                    block.items.push(Item::Frame(frame));
                }
                Token::LoopStart => block.items.push(Item::Loop(self.parse_loop(line)?)),
                Token::Tag(tag) => match self.next()? {
                    (Token::Value(value), _) => block.items.push(Item::Pair { tag, value }),
                    _ => return Err(CifError::MissingValue { tag, line }),
                },
                Token::Value(value) => return Err(CifError::UnexpectedValue { value, line }),
                Token::Stop => {}
            }
        }
        Ok(block)
    }

    fn parse_loop(&mut self, line: usize) -> Result<Loop> {
        let mut lp = Loop::default();
        loop {
            match self.next()? {
                (Token::Tag(tag), _) => lp.tags.push(tag),
                (token, token_line) => {
                    self.push_back(token, token_line);
                    break;
                }
            }
        }
        if lp.tags.is_empty() {
            return Err(CifError::EmptyLoop { line });
        }
        loop {
            match self.next()? {
                (Token::Value(value), _) => lp.values.push(value),
                (Token::Stop, _) => break,
                (token, token_line) => {
                    self.push_back(token, token_line);
                    break;
                }
            }
        }
        if lp.values.len() % lp.tags.len() != 0 {
            return Err(CifError::LoopValueCount {
                first_tag: lp.tags[0].clone(),
                tags: lp.tags.len(),
                values: lp.values.len(),
                line,
            });
        }
        Ok(lp)
    }
}

fn classify_unquoted(s: &str) -> Token {
    let starts_with_word = |word: &str| {
        s.get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word))
    };
    if starts_with_word("data_") {
        Token::DataBlock(s[5..].to_string())
    } else if s.eq_ignore_ascii_case("loop_") {
        Token::LoopStart
    } else if s.eq_ignore_ascii_case("global_") {
        Token::Global
    } else if s.eq_ignore_ascii_case("stop_") {
        Token::Stop
    } else if starts_with_word("save_") {
        if s.len() == 5 {
            Token::SaveEnd
        } else {
            Token::SaveStart(s[5..].to_string())
        }
    } else if s.starts_with('_') {
        Token::Tag(s.to_string())
    } else {
        Token::Value(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_pairs() {
        let doc = parse("data_test\n_cell.length_a 50.0\n_cell.length_b 60.0\n").unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].name, "test");
        assert_eq!(doc.blocks[0].find_value("_cell.length_a"), Some("50.0"));
        assert_eq!(doc.blocks[0].find_value("_CELL.LENGTH_B"), Some("60.0"));
    }

    #[test]
    fn test_loop_basic() {
        let doc = parse("data_test\nloop_\n_col1\n_col2\na b\nc d\n").unwrap();
        let lp = doc.blocks[0].loops().next().unwrap();
        assert_eq!(lp.tags, vec!["_col1", "_col2"]);
        assert_eq!(lp.length(), 2);
        assert_eq!(lp.values, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_quoted_values_keep_quotes() {
        let doc = parse("data_t\n_a 'hello world'\n_b \"it's\"\n_c 'o'\n").unwrap();
        let block = &doc.blocks[0];
        assert_eq!(block.find_value("_a"), Some("'hello world'"));
        assert_eq!(block.find_value("_b"), Some("\"it's\""));
        assert_eq!(block.find_value("_c"), Some("'o'"));
    }

    #[test]
    fn test_quote_inside_word_does_not_close() {
        let doc = parse("data_t\n_a 'don't stop'\n").unwrap();
        assert_eq!(doc.blocks[0].find_value("_a"), Some("'don't stop'"));
    }

    #[test]
    fn test_semicolon_text_field() {
        let doc = parse("data_t\n_a\n;line one\nline two\n;\n_b x\n").unwrap();
        let block = &doc.blocks[0];
        assert_eq!(block.find_value("_a"), Some(";line one\nline two\n;"));
        assert_eq!(block.find_value("_b"), Some("x"));
    }

    #[test]
    fn test_null_markers_are_plain_values() {
        let doc = parse("data_t\n_a .\n_b ?\n_c '.'\n").unwrap();
        let block = &doc.blocks[0];
        assert_eq!(block.find_value("_a"), Some("."));
        assert_eq!(block.find_value("_b"), Some("?"));
        assert_eq!(block.find_value("_c"), Some("'.'"));
    }

    #[test]
    fn test_comments_are_skipped() {
        let doc = parse("# header\ndata_t\n_a v1 # trailing\n_b v2\n").unwrap();
        assert_eq!(doc.blocks[0].find_value("_a"), Some("v1"));
        assert_eq!(doc.blocks[0].find_value("_b"), Some("v2"));
    }

    #[test]
    fn test_multiple_blocks() {
        let doc = parse("data_first\n_a 1\ndata_second\n_b 2\n").unwrap();
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1].name, "second");
        assert!(doc.find_block("first").is_some());
    }

    #[test]
    fn test_loop_ends_at_next_tag() {
        let doc = parse("data_t\nloop_\n_x\n1\n2\n_y 3\n").unwrap();
        let block = &doc.blocks[0];
        assert_eq!(block.loops().next().unwrap().length(), 2);
        assert_eq!(block.find_value("_y"), Some("3"));
    }

    #[test]
    fn test_save_frames_are_nested() {
        let doc = parse("data_d\nsave_x\n_a 1\nsave_\n_b 2\n").unwrap();
        let block = &doc.blocks[0];
        assert!(matches!(block.items[0], Item::Frame(ref f) if f.name == "x"));
        assert_eq!(block.find_value("_b"), Some("2"));
        assert_eq!(block.find_value("_a"), None);
    }

    #[test]
    fn test_unterminated_quote_reports_line() {
        let err = parse("data_t\n_a 1\n_b 'open\n").unwrap_err();
        assert!(matches!(err, CifError::UnterminatedQuote { line: 3 }));
    }

    #[test]
    fn test_unterminated_text_field() {
        let err = parse("data_t\n_a\n;never closed\n").unwrap_err();
        assert!(matches!(err, CifError::UnterminatedTextField { line: 3 }));
    }

    #[test]
    fn test_loop_value_count_mismatch() {
        let err = parse("data_t\nloop_\n_x\n_y\n1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            CifError::LoopValueCount {
                tags: 2,
                values: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_tag_without_value() {
        let err = parse("data_t\n_a\n_b 1\n").unwrap_err();
        assert!(matches!(err, CifError::MissingValue { ref tag, line: 2 } if tag == "_a"));
    }

    #[test]
    fn test_content_before_block() {
        let err = parse("_a 1\ndata_t\n").unwrap_err();
        assert!(matches!(err, CifError::OutsideBlock { line: 1 }));
    }

    #[test]
    fn test_reserved_words_ignore_case() {
        let doc = parse("DATA_Up\nLOOP_\n_x\n1\n").unwrap();
        assert_eq!(doc.blocks[0].name, "Up");
        assert_eq!(doc.blocks[0].loops().count(), 1);
    }
}
