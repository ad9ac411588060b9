use std::io;
use std::ops::ControlFlow;
use std::sync::LazyLock;

use pgn_reader::{Nag, Outcome, RawComment, Reader, SanPlus, Skip, Visitor};
use regex::Regex;

use crate::error::Result;
use crate::model::{Color, Move};

/// Starting position of unmodified chess.
pub(crate) const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static CLOCK_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%clk\s+(\d+):(\d{1,2}):(\d{1,2}(?:\.\d+)?)\]").expect("valid clock regex")
});

/// Parse PGN or bare movetext into the mainline moves.
///
/// Comments attach to the move they follow; a `[%clk]` annotation inside a
/// comment becomes that move's clock. Variations are skipped.
pub(crate) fn parse_moves(pgn: &str) -> Result<Vec<Move>> {
    if pgn.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = Reader::new(io::Cursor::new(pgn.as_bytes()));
    let mut visitor = MoveCollector;
    let moves = reader.read_game(&mut visitor)?.unwrap_or_default();

    Ok(moves
        .into_iter()
        .map(|mut m| {
            m.clock = m.comment.as_deref().and_then(parse_clock);
            m
        })
        .collect())
}

/// Centiseconds from the first `[%clk H:MM:SS.f]` annotation in `comment`.
pub(crate) fn parse_clock(comment: &str) -> Option<u32> {
    let captures = CLOCK_ANNOTATION.captures(comment)?;
    let hours: f64 = captures[1].parse().ok()?;
    let minutes: f64 = captures[2].parse().ok()?;
    let seconds: f64 = captures[3].parse().ok()?;

    Some(((hours * 3600.0 + minutes * 60.0 + seconds) * 100.0).round() as u32)
}

struct MoveCollector;

impl MoveCollector {
    fn append_comment(moves: &mut [Move], text: &[u8]) {
        // A comment before the first move describes the game, not a move.
        let Some(last) = moves.last_mut() else {
            return;
        };
        let text = String::from_utf8_lossy(text);
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match &mut last.comment {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(text);
            }
            None => last.comment = Some(text.to_string()),
        }
    }
}

impl Visitor for MoveCollector {
    type Tags = ();
    type Movetext = Vec<Move>;
    type Output = Vec<Move>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, _tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(Vec::with_capacity(128))
    }

    fn san(&mut self, moves: &mut Self::Movetext, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        let ply = moves.len() as u32;
        moves.push(Move {
            number: ply / 2 + 1,
            color: if ply % 2 == 0 { Color::White } else { Color::Black },
            notation: san_plus.to_string(),
            comment: None,
            clock: None,
        });
        ControlFlow::Continue(())
    }

    fn nag(&mut self, _moves: &mut Self::Movetext, _nag: Nag) -> ControlFlow<Self::Output> {
        ControlFlow::Continue(())
    }

    fn comment(
        &mut self,
        moves: &mut Self::Movetext,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        Self::append_comment(moves, comment.as_bytes());
        ControlFlow::Continue(())
    }

    fn partial_comment(
        &mut self,
        moves: &mut Self::Movetext,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        Self::append_comment(moves, comment.as_bytes());
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _moves: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn outcome(
        &mut self,
        _moves: &mut Self::Movetext,
        _outcome: Outcome,
    ) -> ControlFlow<Self::Output> {
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, moves: Self::Movetext) -> Self::Output {
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_movetext() {
        let moves = parse_moves("e4 e5 Nf3 Nc6 Bb5").unwrap();
        let notation: Vec<_> = moves.iter().map(|m| m.notation.as_str()).collect();
        assert_eq!(notation, ["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(moves[1].number, 1);
        assert_eq!(moves[1].color, Color::Black);
        assert_eq!(moves[4].number, 3);
        assert!(moves.iter().all(|m| m.clock.is_none()));
    }

    #[test]
    fn test_parse_pgn_with_clock_comments() {
        let pgn = r#"[Event "Live Chess"]
[Result "0-1"]

1. d4 {[%clk 0:03:00.9]} 1... Nf6 {[%clk 0:02:59.1]} 2. c4 {[%clk 1:00:00]} 0-1"#;
        let moves = parse_moves(pgn).unwrap();
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].notation, "d4");
        assert_eq!(moves[0].clock, Some(18090));
        assert_eq!(moves[1].clock, Some(17910));
        assert_eq!(moves[2].clock, Some(360000));
        assert_eq!(moves[0].comment.as_deref(), Some("[%clk 0:03:00.9]"));
    }

    #[test]
    fn test_variations_are_skipped() {
        let moves = parse_moves("1. e4 (1. d4 d5) 1... c5 *").unwrap();
        let notation: Vec<_> = moves.iter().map(|m| m.notation.as_str()).collect();
        assert_eq!(notation, ["e4", "c5"]);
    }

    #[test]
    fn test_parse_clock_rounds_to_centiseconds() {
        assert_eq!(parse_clock("[%clk 0:00:01.25]"), Some(125));
        assert_eq!(parse_clock("[%clk 0:01:00]"), Some(6000));
        assert_eq!(parse_clock("no clock here"), None);
    }

    #[test]
    fn test_empty_movetext() {
        assert!(parse_moves("   ").unwrap().is_empty());
    }
}
