//! Deterministic replies used when the completion API cannot be reached.

use crate::keywords::{Category, detect_category};
use crate::models::MovieMetadata;

pub const HORROR_FALLBACK: &str = "Looking for something scary? Here are a few horror picks worth a look:

- **The Conjuring** (2013): a chilling haunted-house case file
- **Hereditary** (2018): a family drama that turns into pure dread
- **Get Out** (2017): sharp social horror with real tension
- **A Quiet Place** (2018): survival horror where every sound counts

Tell me which kind of scare you enjoy and I can narrow it down.";

pub const COMEDY_FALLBACK: &str = "In the mood to laugh? These comedies are easy crowd-pleasers:

- **Superbad** (2007): chaotic coming-of-age fun
- **The Grand Budapest Hotel** (2014): whimsical and stylish
- **Game Night** (2018): a party game that spirals out of control
- **Paddington 2** (2017): pure warmth for the whole family

Tell me the kind of humor you like and I can find more.";

pub const ACTION_FALLBACK: &str = "Ready for some action? Here are high-energy picks:

- **Mad Max: Fury Road** (2015): a relentless desert chase
- **John Wick** (2014): slick, stylish fight choreography
- **Die Hard** (1988): the classic one-man-army thriller
- **Mission: Impossible - Fallout** (2018): jaw-dropping practical stunts

Tell me whether you prefer martial arts, heists, or car chases.";

pub const GENERAL_FALLBACK: &str = "I'm your movie and TV companion. Here is what I can do:

- **Recommend** films and shows by genre, mood, or favorite actor
- **Look up** details like director, cast, rating, and runtime
- **Share trivia** and behind-the-scenes facts

Try asking \"Tell me about Inception\" or \"suggest a funny movie\".";

/// Reply returned when no completion credential is configured
pub const ADVISORY_REPLY: &str = "The chat assistant is not fully configured yet: no language model API key is set, so only basic movie information is available. Please ask the administrator to configure OPENROUTER_API_KEY.";

/// Template for a resolved title
pub fn movie_fallback(metadata: &MovieMetadata) -> String {
    format!(
        "**{title}** ({year})

- **Genre:** {genre}
- **Director:** {director}
- **Rating:** {rating}
- **Cast:** {cast}
- **Runtime:** {runtime}

{plot}

Ask me for similar titles or more about {title}.",
        title = metadata.title,
        year = metadata.year,
        genre = metadata.genre,
        director = metadata.director,
        rating = metadata.rating,
        cast = metadata.cast,
        runtime = metadata.runtime,
        plot = metadata.plot,
    )
}

pub fn category_fallback(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Horror) => HORROR_FALLBACK,
        Some(Category::Comedy) => COMEDY_FALLBACK,
        Some(Category::Action) => ACTION_FALLBACK,
        None => GENERAL_FALLBACK,
    }
}

/// Pick the fallback for a failed completion: the movie template when a
/// title resolved, otherwise the first matching genre template.
pub fn fallback_reply(message: &str, metadata: Option<&MovieMetadata>) -> String {
    match metadata {
        Some(metadata) => movie_fallback(metadata),
        None => category_fallback(detect_category(message)).to_string(),
    }
}
