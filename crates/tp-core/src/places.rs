//! Place search: finding things to add to the plan by name.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::entry::{Activity, EntryDraft};
use crate::time::ClockTime;
use crate::types::Category;

/// Shortest query a search will act on.
pub const MIN_QUERY_CHARS: usize = 2;

/// A place suggested by a [`PlaceSearch`], with typical visit figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    pub name: String,
    pub category: Category,
    pub estimated_duration_minutes: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_cost: Decimal,
    pub address: String,
    pub transit_hint: String,
}

impl PlaceCandidate {
    /// A draft visiting this place with its estimated duration and cost.
    pub fn into_draft(self, date: NaiveDate, start_time: ClockTime) -> EntryDraft {
        let activity = Activity {
            category: self.category,
            cost: self.estimated_cost,
            address: self.address,
            transit_hint: self.transit_hint,
            notes: String::new(),
        };
        EntryDraft::activity(
            self.name,
            date,
            start_time,
            self.estimated_duration_minutes,
            activity,
        )
    }
}

/// Something that can look places up by name.
///
/// No match is an empty list, never an error.
pub trait PlaceSearch {
    fn search(&self, query: &str) -> Vec<PlaceCandidate>;
}

/// An in-memory list of places searched by name.
#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    places: Vec<PlaceCandidate>,
}

struct CatalogRow {
    name: &'static str,
    category: Category,
    minutes: u32,
    cost_cents: i64,
    address: &'static str,
    transit: &'static str,
}

const fn row(
    name: &'static str,
    category: Category,
    minutes: u32,
    cost_cents: i64,
    address: &'static str,
    transit: &'static str,
) -> CatalogRow {
    CatalogRow {
        name,
        category,
        minutes,
        cost_cents,
        address,
        transit,
    }
}

const OLD_TOWN_BUSES: &str = "Bus 23, 27, 41, 42 or 67";

#[rustfmt::skip]
static EDINBURGH: [CatalogRow; 25] = [
    row("Edinburgh Castle", Category::Attraction, 120, 1800, "Castlehill, Edinburgh EH1 2NG", OLD_TOWN_BUSES),
    row("Royal Mile", Category::Attraction, 90, 0, "Royal Mile, Edinburgh", "Walkable from the city centre"),
    row("National Museum of Scotland", Category::Attraction, 150, 0, "Chambers St, Edinburgh EH1 1JF", OLD_TOWN_BUSES),
    row("Arthur's Seat", Category::Attraction, 120, 0, "Queen's Dr, Edinburgh EH8 8HG", "Bus 6, 35 or 49"),
    row("Palace of Holyroodhouse", Category::Attraction, 90, 1750, "Canongate, Edinburgh EH8 8DX", "Bus 6, 35 or 36"),
    row("Royal Yacht Britannia", Category::Attraction, 120, 1900, "Ocean Terminal, Leith, Edinburgh EH6 6JJ", "Bus 11, 22 or 35"),
    row("Royal Botanic Garden", Category::Attraction, 120, 0, "Arboretum Pl, Edinburgh EH3 5NZ", "Bus 8, 23 or 27"),
    row("Camera Obscura", Category::Attraction, 90, 1995, "Castlehill, Royal Mile, Edinburgh EH1 2ND", OLD_TOWN_BUSES),
    row("The Scotch Whisky Experience", Category::Attraction, 80, 1900, "354 Castlehill, Edinburgh EH1 2NE", OLD_TOWN_BUSES),
    row("St Giles' Cathedral", Category::Attraction, 60, 0, "High St, Edinburgh EH1 1RE", OLD_TOWN_BUSES),
    row("Scottish National Gallery", Category::Attraction, 90, 0, "The Mound, Edinburgh EH2 2EL", OLD_TOWN_BUSES),
    row("Calton Hill", Category::Attraction, 60, 0, "Edinburgh EH7 5AA", "Bus 8, 23 or 27"),
    row("The Elephant House", Category::Cafe, 60, 1500, "21 George IV Bridge, Edinburgh EH1 1EN", OLD_TOWN_BUSES),
    row("The Witchery", Category::Restaurant, 120, 4500, "352 Castlehill, Edinburgh EH1 2NF", OLD_TOWN_BUSES),
    row("The Dome", Category::Restaurant, 90, 3500, "14 George St, Edinburgh EH2 2PF", "Bus 8, 23, 27 or 41"),
    row("Cold Town House", Category::Bar, 90, 2500, "4 Grassmarket, Edinburgh EH1 2JU", "Bus 2, 35 or 67"),
    row("The Devil's Advocate", Category::Bar, 90, 3000, "9 Advocate's Cl, Edinburgh EH1 1ND", OLD_TOWN_BUSES),
    row("Princes Street Gardens", Category::Attraction, 60, 0, "Princes St, Edinburgh EH2 2HG", "Bus 1, 10, 11, 16, 22 or 30"),
    row("Dean Village", Category::Attraction, 70, 0, "Dean Path, Edinburgh EH4 3AY", "Bus 19, 36, 37 or 47"),
    row("Edinburgh Dungeon", Category::Attraction, 70, 1850, "31 Market St, Edinburgh EH1 1DF", OLD_TOWN_BUSES),
    row("White Hart Inn", Category::Bar, 120, 2500, "34 Grassmarket, Edinburgh EH1 2JU", "Bus 2, 23, 35 or 67"),
    row("Greyfriars Bobby's Bar", Category::Bar, 90, 2000, "30-34 Candlemaker Row, Edinburgh EH1 2QE", "Bus 2, 23, 27, 35, 41 or 42"),
    row("The Sheep Heid Inn", Category::Restaurant, 120, 3000, "43-45 The Causeway, Edinburgh EH15 3QA", "Bus 42 or 44"),
    row("Dynamic Earth", Category::Attraction, 120, 1650, "Holyrood Rd, Edinburgh EH8 8AS", "Bus 6, 35 or 36"),
    row("Mary King's Close", Category::Attraction, 60, 1895, "2 Warriston's Close, High St, Edinburgh EH1 1PG", OLD_TOWN_BUSES),
];

impl LocalCatalog {
    pub const fn new(places: Vec<PlaceCandidate>) -> Self {
        Self { places }
    }

    /// The built-in catalog of Edinburgh sights, restaurants and bars.
    pub fn edinburgh() -> Self {
        let places = EDINBURGH
            .iter()
            .map(|row| PlaceCandidate {
                name: row.name.to_string(),
                category: row.category,
                estimated_duration_minutes: row.minutes,
                estimated_cost: Decimal::new(row.cost_cents, 2),
                address: row.address.to_string(),
                transit_hint: row.transit.to_string(),
            })
            .collect();
        Self::new(places)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl PlaceSearch for LocalCatalog {
    /// Case-insensitive substring match on the name, in catalog order.
    fn search(&self, query: &str) -> Vec<PlaceCandidate> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }
        self.places
            .iter()
            .filter(|place| place.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }
}
