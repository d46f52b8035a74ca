use cardchess::chess::cards::Deck;
use cardchess::config::{CardsConfig, Rules};
use itertools::Itertools;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn standard_pool() -> CardsConfig {
    Rules::standard().expect("embedded rules are valid").cards
}

#[test]
fn deck_size_is_sum_of_frequencies() {
    let pool = standard_pool();
    let deck = Deck::new(&pool, &mut StdRng::seed_from_u64(0));
    let expected: u32 = pool.cards.iter().map(|card| card.frequency).sum();
    assert_eq!(deck.remaining(), expected as usize);
    assert_eq!(deck.remaining(), 15);
}

#[test]
fn draw_takes_exactly_count() {
    let mut deck = Deck::new(&standard_pool(), &mut StdRng::seed_from_u64(1));
    let drawn = deck.draw(4);
    assert_eq!(drawn.len(), 4);
    assert_eq!(deck.remaining(), 11);
    assert!(drawn.iter().all(|card| !card.used));
}

#[test]
fn exhausted_deck() {
    let mut deck = Deck::new(&standard_pool(), &mut StdRng::seed_from_u64(2));
    assert_eq!(deck.draw(100).len(), 15);
    assert!(deck.is_empty());
    assert!(deck.draw(1).is_empty());
    assert!(deck.draw(0).is_empty());
}

#[test]
fn card_ids_are_unique() {
    let mut deck = Deck::new(&standard_pool(), &mut StdRng::seed_from_u64(3));
    let ids = deck.draw(15).iter().map(|card| card.id).unique().count();
    assert_eq!(ids, 15);
}

#[test]
fn shuffle_depends_on_seed() {
    let pool = standard_pool();
    let orders: Vec<Vec<String>> = (0..8)
        .map(|seed| {
            Deck::new(&pool, &mut StdRng::seed_from_u64(seed))
                .draw(15)
                .iter()
                .map(ToString::to_string)
                .collect()
        })
        .collect();
    assert!(orders.iter().unique().count() > 1);
    assert_eq!(
        orders[0],
        Deck::new(&pool, &mut StdRng::seed_from_u64(0))
            .draw(15)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    );
}
