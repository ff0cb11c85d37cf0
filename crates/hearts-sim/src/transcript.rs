//! Human-readable play-by-play for verbose runs.

use std::io::{self, Write};

use hearts_core::game::match_state::MatchState;
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::trick::Play;

fn cards_line(cards: impl Iterator<Item = Card>) -> String {
    cards.map(|card| card.to_string()).collect::<Vec<_>>().join(" ")
}

fn hand_line(hand: &Hand) -> String {
    cards_line(hand.iter())
}

pub fn round_start<W: Write>(out: &mut W, state: &MatchState) -> io::Result<()> {
    writeln!(
        out,
        "Round {} ({} pass)",
        state.round_number(),
        state.passing_direction().as_str()
    )?;
    hands(out, state)
}

pub fn hands<W: Write>(out: &mut W, state: &MatchState) -> io::Result<()> {
    for seat in PlayerPosition::LOOP {
        writeln!(
            out,
            "Hand of player {}: {}",
            seat.index(),
            hand_line(state.round().hand(seat))
        )?;
    }
    Ok(())
}

pub fn passes<W: Write>(out: &mut W, state: &MatchState, passed: &[[Card; 3]; 4]) -> io::Result<()> {
    let direction = state.passing_direction();
    for seat in PlayerPosition::LOOP {
        writeln!(
            out,
            "Player {} passes {} to player {}",
            seat.index(),
            cards_line(passed[seat.index()].iter().copied()),
            direction.target(seat).index()
        )?;
    }
    hands(out, state)
}

pub fn trick_leader<W: Write>(out: &mut W, leader: PlayerPosition) -> io::Result<()> {
    writeln!(out, "Player {} is first.", leader.index())
}

pub fn trick_result<W: Write>(
    out: &mut W,
    plays: &[Play],
    winner: PlayerPosition,
    points: u8,
    moon_shooter: Option<PlayerPosition>,
) -> io::Result<()> {
    let table = plays
        .iter()
        .map(|play| format!("{}:{}", play.position.index(), play.card))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "Cards on table: {table}")?;
    writeln!(out, "Player {} takes {points} point(s).", winner.index())?;
    if let Some(shooter) = moon_shooter {
        writeln!(out, "Player {} shot the moon!", shooter.index())?;
    }
    writeln!(out)
}

pub fn round_end<W: Write>(out: &mut W, state: &MatchState) -> io::Result<()> {
    writeln!(out, "Current points:")?;
    for seat in PlayerPosition::LOOP {
        writeln!(out, "{}: {}", seat.index(), state.scores().score(seat))?;
    }
    if state.is_game_over() {
        writeln!(out, "End of this game.")?;
    } else {
        writeln!(out, "End of round {}.", state.round_number())?;
    }
    writeln!(out)
}
