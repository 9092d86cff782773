//! Scripted replies used when no model is reachable.
//!
//! Rules are checked in order and the first match wins. Only the plan review
//! and the budget answer look at the schedule itself.

use chrono::NaiveDate;
use tp_core::time::format_minutes;
use tp_core::{Currency, ScheduleStore, daily_load, is_overloaded, total_cost};

/// Answers `question` without a model.
pub fn scripted_reply(store: &ScheduleStore, question: &str) -> String {
    let message = Message::new(question);

    if message.has_word(&["hello", "hi", "hey", "bonjour"]) {
        return "Hello! How can I help you plan your stay in Edinburgh?".to_string();
    }
    if message.has_word(&["weather", "rain", "forecast", "temperature", "climate"]) {
        return "In May Edinburgh averages around 12°C with highs near 15°C. It is usually \
                a pleasant month, but pack a waterproof: showers are frequent in Scotland."
            .to_string();
    }
    if message.has_word(&["transport", "bus", "tram", "taxi", "travel"])
        || message.has_phrase("get around")
    {
        return "Edinburgh is very walkable, especially in the centre. For longer trips the \
                Lothian bus network is excellent, with day tickets around £5. Trams run to \
                the airport and Leith; taxis are available but cost more."
            .to_string();
    }
    if message.has_word(&["budget", "cost", "costs", "price", "expensive", "money"]) {
        return budget_reply(store);
    }
    if message.has_word(&["restaurant", "restaurants", "eat", "food", "dinner", "lunch"]) {
        return "For traditional Scottish food try The Albanach on the Royal Mile or the Whiski \
                Bar & Restaurant. For something special, The Witchery by the castle is a \
                unique experience. Do try haggis, the national dish!"
            .to_string();
    }
    if message.has_word(&["castle"]) {
        return "Edinburgh Castle is the city's most popular sight. Allow about two hours and \
                arrive early (it opens at 9:30) to avoid the crowds. Don't miss the One \
                O'Clock Gun, fired daily since 1861."
            .to_string();
    }
    if message.has_phrase("royal mile") {
        return "The Royal Mile is the Old Town's main street, running from the castle to \
                Holyrood Palace. Along the way you'll find shops, pubs and St Giles' \
                Cathedral. Take time to explore the closes leading off either side."
            .to_string();
    }
    if message.has_word(&["whisky", "whiskey"]) {
        return "For Scotch whisky, try The Scotch Whisky Experience near the castle, or \
                Cadenhead's Whisky Shop for unusual bottles. Pubs such as The Bow Bar also \
                have a fine selection of single malts."
            .to_string();
    }
    if message.has_phrase("arthur") {
        return "Arthur's Seat is an ancient volcano with panoramic views over the city. The \
                climb takes an hour to an hour and a half, so wear good shoes. Sunrise and \
                sunset are magical up there if the weather allows!"
            .to_string();
    }
    if !store.is_empty()
        && message.has_word(&[
            "day",
            "plan",
            "schedule",
            "programme",
            "suggest",
            "suggestion",
            "recommend",
        ])
    {
        return review_day(store, first_planned_day(store));
    }

    if store.is_empty() {
        "You haven't added anything to your plan yet. Would you like some ideas to start? \
         Edinburgh Castle and the Royal Mile are must-sees on a first visit."
            .to_string()
    } else {
        format!(
            "You have {} entries planned for your stay. {} Feel free to ask me for \
             recommendations that match your interests!",
            store.len(),
            review_day(store, store.window().start())
        )
    }
}

/// Comments on how full `day` is.
pub fn review_day(store: &ScheduleStore, day: NaiveDate) -> String {
    let date = day.format("%A %-d %B");
    let entries = store.entries_on_date(day);
    match entries.as_slice() {
        [] => format!(
            "Nothing is planned for {date} yet. How about Edinburgh Castle in the morning \
             and a stroll down the Royal Mile afterwards?"
        ),
        [only] => format!(
            "You already have {} planned. To round off {date}, how about a visit to the \
             National Museum of Scotland?",
            only.title()
        ),
        several => {
            let load = daily_load(store, day);
            if is_overloaded(load) {
                format!(
                    "Careful, {date} looks very busy with {} entries totalling {}. Consider \
                     moving some of them to another day.",
                    several.len(),
                    format_minutes(load)
                )
            } else {
                format!(
                    "Your plan for {date} looks well balanced! Remember to leave time for \
                     getting between places."
                )
            }
        }
    }
}

fn budget_reply(store: &ScheduleStore) -> String {
    let general = "A typical budget for Edinburgh is €100-150 per person per day, including \
                   accommodation, meals and a few attractions. If you plan several paid \
                   sights, the Royal Edinburgh Ticket covers three major ones.";
    if store.is_empty() {
        return general.to_string();
    }
    let planned = Currency::Eur.display(total_cost(store, Currency::Eur));
    format!("{general} Your planned activities currently add up to {planned}.")
}

fn first_planned_day(store: &ScheduleStore) -> NaiveDate {
    store
        .sorted_entries()
        .first()
        .map_or_else(|| store.window().start(), |entry| entry.date())
}

/// A lower-cased question split into words.
struct Message {
    text: String,
    words: Vec<String>,
}

impl Message {
    fn new(question: &str) -> Self {
        let text = question.to_lowercase();
        let words = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { text, words }
    }

    fn has_word(&self, candidates: &[&str]) -> bool {
        self.words.iter().any(|w| candidates.contains(&w.as_str()))
    }

    fn has_phrase(&self, phrase: &str) -> bool {
        self.text.contains(phrase)
    }
}
