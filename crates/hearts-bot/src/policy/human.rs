use super::{Policy, PolicyContext, PolicyError};
use hearts_core::model::hand::{HAND_SLOTS, Hand};
use std::io::{BufRead, Write};

/// Prompts a person for every decision over injected text streams.
///
/// Bad input (not a number, out of range, an empty slot, a repeated pass
/// slot) is reported and the prompt repeats; nothing is guessed.
#[derive(Debug)]
pub struct HumanPolicy<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPolicy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String, PolicyError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PolicyError::InputClosed);
        }
        Ok(line)
    }

    fn show_hand(&mut self, hand: &Hand) -> Result<(), PolicyError> {
        let listing = hand
            .occupied()
            .map(|(slot, card)| format!("{slot}:{card}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.output, "Your hand: {listing}")?;
        Ok(())
    }
}

fn parse_index(token: &str, bound: usize) -> Option<usize> {
    token.parse::<usize>().ok().filter(|index| *index < bound)
}

impl<R, W> Policy for HumanPolicy<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn choose_pass(&mut self, ctx: &PolicyContext) -> Result<[usize; 3], PolicyError> {
        let hand = ctx.hand();
        let target = ctx.state.passing_direction().target(ctx.seat);
        self.show_hand(hand)?;

        let mut picked: Vec<usize> = Vec::with_capacity(3);
        while picked.len() < 3 {
            writeln!(
                self.output,
                "Please enter {} more card(s) to pass to {target} [0-{}]",
                3 - picked.len(),
                HAND_SLOTS - 1
            )?;
            self.output.flush()?;
            let line = self.read_line()?;
            for token in line.split_whitespace() {
                let Some(slot) = parse_index(token, HAND_SLOTS) else {
                    writeln!(self.output, "'{token}' is not a slot between 0 and {}", HAND_SLOTS - 1)?;
                    break;
                };
                let Some(card) = hand.slot(slot) else {
                    writeln!(self.output, "slot {slot} is empty")?;
                    break;
                };
                if picked.contains(&slot) {
                    writeln!(self.output, "slot {slot} is already chosen")?;
                    break;
                }
                writeln!(self.output, "You pass {card}")?;
                picked.push(slot);
                if picked.len() == 3 {
                    break;
                }
            }
        }
        Ok([picked[0], picked[1], picked[2]])
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<usize, PolicyError> {
        let hand = ctx.hand();
        if ctx.legal.is_empty() {
            return Err(PolicyError::NoLegalMove { seat: ctx.seat });
        }
        let options: Vec<(usize, String)> = ctx
            .legal
            .iter()
            .filter_map(|slot| hand.slot(slot).map(|card| (slot, card.to_string())))
            .collect();

        self.show_hand(hand)?;
        let table = ctx
            .state
            .round()
            .current_trick()
            .plays()
            .map(|play| format!("{}:{}", play.position, play.card))
            .collect::<Vec<_>>()
            .join(" ");
        if !table.is_empty() {
            writeln!(self.output, "On the table: {table}")?;
        }
        let listing = options
            .iter()
            .enumerate()
            .map(|(index, (_, card))| format!("{index}:{card}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.output, "Your valid cards are: {listing}")?;

        loop {
            writeln!(
                self.output,
                "Which one do you want to play? [0-{}]",
                options.len() - 1
            )?;
            self.output.flush()?;
            let line = self.read_line()?;
            let token = line.trim();
            match parse_index(token, options.len()) {
                Some(index) => return Ok(options[index].0),
                None => writeln!(self.output, "'{token}' is not one of the listed choices")?,
            }
        }
    }

    fn label(&self) -> String {
        "human".to_string()
    }
}
