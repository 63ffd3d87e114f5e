//! `STATE END` framing
//!
//! The same framing is used on both boundaries: the tournament sends state lines followed
//! by the sentinel, and the engine receives exactly the same shape.

use crate::block::StateBlock;

/// Marks the end of one state block. Consumed, never forwarded as block content.
pub const SENTINEL: &str = "STATE END";

/// Remove one line terminator (`\n` or `\r\n`) from the end of `line`
///
/// Nothing else is trimmed: block lines are stored verbatim and the sentinel comparison
/// is exact.
pub fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Line accumulation state machine
///
/// Feed lines in arrival order; a completed block is handed back each time the sentinel
/// arrives, and the buffer starts over empty.
#[derive(Debug, Default)]
pub struct BlockDecoder {
    buffer: StateBlock,
}

impl BlockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line (with or without its terminator)
    pub fn push_line(&mut self, line: &str) -> Option<StateBlock> {
        let line = strip_line_terminator(line);
        if line == SENTINEL {
            Some(std::mem::take(&mut self.buffer))
        } else {
            self.buffer.push(line);
            None
        }
    }

    /// Lines received since the last sentinel
    pub fn pending(&self) -> &[String] {
        self.buffer.lines()
    }

    /// Drain the incomplete block, e.g. at end-of-stream
    pub fn take_partial(&mut self) -> Vec<String> {
        std::mem::take(&mut self.buffer).into_lines()
    }
}

/// Encode a block as wire text: each line, then the sentinel, all `\n`-terminated
pub fn encode_block(block: &StateBlock) -> String {
    let mut out = block.to_payload();
    out.push_str(SENTINEL);
    out.push('\n');
    out
}

/// Split wire text into completed blocks plus any trailing partial lines
pub fn decode_blocks(text: &str) -> (Vec<StateBlock>, Vec<String>) {
    let mut decoder = BlockDecoder::new();
    let blocks = text
        .split_inclusive('\n')
        .filter_map(|line| decoder.push_line(line))
        .collect();
    (blocks, decoder.take_partial())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_terminator() {
        assert_eq!(strip_line_terminator("STATE END\n"), "STATE END");
        assert_eq!(strip_line_terminator("STATE END\r\n"), "STATE END");
        assert_eq!(strip_line_terminator("a b  \n"), "a b  ");
        assert_eq!(strip_line_terminator("no terminator"), "no terminator");
        assert_eq!(strip_line_terminator("\n"), "");
    }

    #[test]
    fn test_decoder_completes_on_sentinel() {
        let mut decoder = BlockDecoder::new();
        assert!(decoder.push_line("A\n").is_none());
        assert!(decoder.push_line("B\n").is_none());
        assert_eq!(decoder.pending(), &["A", "B"]);

        let block = decoder.push_line("STATE END\n").unwrap();
        assert_eq!(block.lines(), &["A", "B"]);
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_decoder_empty_blocks() {
        let mut decoder = BlockDecoder::new();
        let first = decoder.push_line("STATE END").unwrap();
        let second = decoder.push_line("STATE END").unwrap();
        assert!(first.is_empty());
        assert!(second.is_empty());
    }

    #[test]
    fn test_sentinel_match_is_exact() {
        let mut decoder = BlockDecoder::new();
        assert!(decoder.push_line(" STATE END\n").is_none());
        assert!(decoder.push_line("STATE END \n").is_none());
        assert!(decoder.push_line("state end\n").is_none());
        let block = decoder.push_line("STATE END\r\n").unwrap();
        assert_eq!(block.lines(), &[" STATE END", "STATE END ", "state end"]);
    }

    #[test]
    fn test_encode_block() {
        let block = StateBlock::from_lines(["A", "B"]);
        assert_eq!(encode_block(&block), "A\nB\nSTATE END\n");
        assert_eq!(encode_block(&StateBlock::new()), "STATE END\n");
    }

    #[test]
    fn test_decode_recovers_encoded_blocks() {
        let blocks = vec![
            StateBlock::from_lines(["REMOVING", "1 -4 Red 3", ""]),
            StateBlock::new(),
            StateBlock::from_lines(["0 0 Blue 12"]),
        ];
        let wire: String = blocks.iter().map(encode_block).collect();

        let (decoded, partial) = decode_blocks(&wire);
        assert_eq!(decoded, blocks);
        assert!(partial.is_empty());
    }

    #[test]
    fn test_decode_reports_partial_tail() {
        let (blocks, partial) = decode_blocks("A\nSTATE END\nB\nC");
        assert_eq!(blocks, vec![StateBlock::from_lines(["A"])]);
        assert_eq!(partial, vec!["B".to_string(), "C".to_string()]);
    }
}
