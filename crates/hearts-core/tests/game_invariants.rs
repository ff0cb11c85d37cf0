use hearts_core::belief::Determinizer;
use hearts_core::game::match_state::MatchState;
use hearts_core::model::card::Card;
use hearts_core::model::card_set::CardSet;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::round::PlayOutcome;
use hearts_core::model::score::GAME_OVER_POINTS;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn random_passes(state: &MatchState, rng: &mut StdRng) -> [[usize; 3]; 4] {
    let mut selections = [[0usize; 3]; 4];
    for seat in PlayerPosition::LOOP {
        let slots: Vec<usize> = state
            .round()
            .hand(seat)
            .occupied()
            .map(|(slot, _)| slot)
            .collect();
        let chosen: Vec<usize> = slots.choose_multiple(rng, 3).copied().collect();
        selections[seat.index()].copy_from_slice(&chosen);
    }
    selections
}

fn random_slot(state: &MatchState, seat: PlayerPosition, rng: &mut StdRng) -> usize {
    let legal = state.legal_moves(seat);
    assert!(!legal.is_empty(), "{seat} has no legal move");
    legal
        .nth(rng.gen_range(0..legal.len()))
        .expect("index within legal count")
}

fn all_cards(state: &MatchState) -> CardSet {
    let round = state.round();
    let mut cards: CardSet = PlayerPosition::LOOP
        .iter()
        .flat_map(|seat| round.hand(*seat).iter())
        .collect();
    for play in round.current_trick().plays() {
        cards.insert(play.card);
    }
    for card in round.played().iter() {
        cards.insert(card);
    }
    cards
}

fn highest_of_led_suit(table: &[(PlayerPosition, Card)]) -> PlayerPosition {
    let led = table[0].1.suit;
    table
        .iter()
        .filter(|(_, card)| card.suit == led)
        .max_by_key(|(_, card)| card.rank)
        .map(|(seat, _)| *seat)
        .expect("the lead card follows its own suit")
}

#[test]
fn random_games_keep_every_invariant() {
    for seed in 0..12u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = MatchState::new();

        while !state.is_game_over() {
            state.start_round(&mut rng);
            if state.passing_direction().requires_selection() {
                let selections = random_passes(&state, &mut rng);
                state.apply_passes(selections).expect("random passes are valid");
            }
            let before: [u32; 4] = *state.scores().standings();
            let mut moon = false;
            let mut first_card = true;
            let mut table: Vec<(PlayerPosition, Card)> = Vec::with_capacity(4);

            while !state.is_round_over() {
                let seat = state.next_to_play();
                let slot = random_slot(&state, seat, &mut rng);
                let outcome = state.play_card(seat, slot).expect("legal play accepted");
                if first_card {
                    assert_eq!(outcome.card(), Card::OPENING_LEAD);
                    first_card = false;
                }
                table.push((seat, outcome.card()));
                if let PlayOutcome::TrickCompleted {
                    winner,
                    moon_shooter,
                    ..
                } = outcome
                {
                    assert_eq!(table.len(), 4);
                    assert_eq!(winner, highest_of_led_suit(&table), "seed {seed}: {table:?}");
                    table.clear();
                    moon |= moon_shooter.is_some();
                }
                assert_eq!(state.round().accounted_cards(), 52);
                assert_eq!(all_cards(&state).len(), 52);
            }

            let gained: u32 = state
                .scores()
                .standings()
                .iter()
                .zip(before.iter())
                .map(|(after, before)| after - before)
                .sum();
            if state.is_game_over() {
                assert!(gained <= 78);
            } else if moon {
                assert_eq!(gained, 78);
            } else {
                assert_eq!(gained, 26);
            }
            state.finish_round();
        }

        assert!(
            state
                .scores()
                .standings()
                .iter()
                .any(|total| *total >= GAME_OVER_POINTS)
        );
        assert!(state.places().contains(&1));
    }
}

#[test]
fn determinized_positions_respect_observed_voids() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut state = MatchState::new();
    state.start_round(&mut rng);
    let selections = random_passes(&state, &mut rng);
    state.apply_passes(selections).expect("valid passes");

    let mut checked = 0;
    while !state.is_round_over() {
        let seat = state.next_to_play();
        let mut guess = state;
        let outcome = Determinizer::determinize(&mut guess, seat, &mut rng);
        assert_eq!(all_cards(&guess).len(), 52);
        assert_eq!(guess.round().hand(seat), state.round().hand(seat));
        for other in PlayerPosition::LOOP {
            assert_eq!(guess.round().hand(other).len(), state.round().hand(other).len());
        }
        if !outcome.exhausted {
            for other in seat.others() {
                for card in guess.round().hand(other).iter() {
                    assert!(!state.beliefs().is_void(other, card.suit));
                }
            }
            checked += 1;
        }

        let slot = random_slot(&state, seat, &mut rng);
        state.play_card(seat, slot).expect("legal play accepted");
    }
    assert!(checked > 0);
}
