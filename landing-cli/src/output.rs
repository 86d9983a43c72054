//! Human-friendly terminal rendering of board state.

use landing_core::{
    Board, Card, CardState, City, CitySuggestion, board::render::suggestion_label,
};

pub fn print_board(board: &Board) {
    if board.is_empty() {
        println!("(no cards)");
        return;
    }
    for card in board.cards() {
        print_card(card);
        println!();
    }
}

pub fn print_card(card: &Card) {
    match &card.state {
        CardState::Skeleton => println!("{} loading…", card.id),
        CardState::Failed(message) => println!("{} ⚠ {message}", card.id),
        CardState::Populated(view) => {
            println!("{} {}", card.id, view.title);
            println!("   {}", view.subtitle);
            println!("   {}  {}  {}", view.temperature, view.humidity, view.wind);
            let days: Vec<String> = view
                .forecast
                .iter()
                .map(|d| format!("{} {}", d.weekday, d.range))
                .collect();
            if !days.is_empty() {
                println!("   {}", days.join("   "));
            }
        }
    }
}

pub fn print_recent(recent: &[City]) {
    if recent.is_empty() {
        println!("No recent cities yet.");
        return;
    }
    for (i, city) in recent.iter().enumerate() {
        match &city.place_name {
            Some(place) => println!("{:>2}. {} ({place})", i + 1, city.name),
            None => println!("{:>2}. {}", i + 1, city.name),
        }
    }
}

pub fn suggestion_row(s: &CitySuggestion) -> String {
    match suggestion_label(s) {
        (primary, secondary) if secondary.is_empty() => primary,
        (primary, secondary) => format!("{primary}  · {secondary}"),
    }
}
