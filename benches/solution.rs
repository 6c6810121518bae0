use criterion::{BatchSize, Criterion};
use set_engine::core::GameRng;
use set_engine::{Card, Game, GameConfig, Market, Supply};

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = Criterion::default()
        .without_plots()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(2));
    targets =
        scanning_playable_market,
        scanning_setless_market,
        playing_full_deck,
}

fn dealt(cards: impl IntoIterator<Item = Card>) -> Market {
    let mut market = Market::new();
    market.push_cards(cards);
    market
}

fn scanning_playable_market(c: &mut Criterion) {
    let mut supply = Supply::shuffled(1, &mut GameRng::new(1));
    let cards = supply.draw(12);
    c.bench_function("scan a 12-card market", |b| {
        b.iter_batched(
            || dealt(cards.iter().copied()),
            |market| market.solution(),
            BatchSize::SmallInput,
        )
    });
}

fn scanning_setless_market(c: &mut Criterion) {
    // Worst case: every triple is examined.
    let cards: Vec<Card> = [57, 57, 3, 3, 19, 19, 37, 37, 1, 1, 2, 2]
        .into_iter()
        .map(Card::make)
        .collect();
    c.bench_function("scan a 12-card market without a set", |b| {
        b.iter_batched(
            || dealt(cards.iter().copied()),
            |market| market.solution(),
            BatchSize::SmallInput,
        )
    });
}

fn playing_full_deck(c: &mut Criterion) {
    c.bench_function("play a full deck to completion", |b| {
        b.iter(|| {
            let mut game = Game::new(GameConfig::new().with_seed(3));
            let Ok(player) = game.add_player("bench") else {
                return 0;
            };
            let _ = game.start();
            let mut taken = 0;
            while let Some(slots) = game.market().solution() {
                if !matches!(game.take_set(player, slots), Ok(true)) {
                    break;
                }
                taken += 1;
            }
            taken
        })
    });
}
