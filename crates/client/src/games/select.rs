//! Shelf selection rules.
//!
//! Pure functions deciding which games make it onto the shelf: a title
//! denylist for recently played noise (wallpaper tools and the like) and a
//! favorites fill for the remaining slots.

use super::response::Game;
use rand::Rng;
use rand::seq::SliceRandom;

/// Built-in favorites used to seed the cached list on first run.
pub const DEFAULT_FAVORITES: &[&str] = &[
    "Portal 2",
    "Half-Life 2",
    "Hades",
    "Outer Wilds",
    "Celeste",
    "Stardew Valley",
];

fn titles_equal(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Drop games whose title appears on the denylist.
///
/// Nameless games never match a denylist title and are kept.
pub fn filter_denylisted(games: Vec<Game>, denylist: &[String]) -> Vec<Game> {
    if denylist.is_empty() {
        return games;
    }

    games
        .into_iter()
        .filter(|game| !denylist.iter().any(|title| !game.name.is_empty() && titles_equal(&game.name, title)))
        .collect()
}

/// Pick up to `needed` favorite games to fill the shelf.
///
/// Favorites are matched by title (case-insensitive) against the owned
/// library, games already on the shelf are excluded by appid, and the
/// survivors are shuffled so the fill varies between visits.
pub fn select_favorites<R: Rng + ?Sized>(
    owned: &[Game], shelf: &[Game], favorites: &[String], needed: usize, rng: &mut R,
) -> Vec<Game> {
    let mut picks: Vec<Game> = owned
        .iter()
        .filter(|game| !game.name.is_empty() && favorites.iter().any(|fav| titles_equal(&game.name, fav)))
        .filter(|game| !shelf.iter().any(|on_shelf| on_shelf.appid == game.appid))
        .cloned()
        .collect();

    picks.shuffle(rng);
    picks.truncate(needed);
    picks
}
