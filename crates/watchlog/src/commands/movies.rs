//! Movie list commands, thin consumers of the session layer.
//!
//! A `None` from `request` means the layer already surfaced whatever went
//! wrong (or the session expired); commands print nothing further.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use crate::cli::MoviesAction;
use watchlog_core::types::{Movie, MovieDraft, MovieEnvelope};
use watchlog_core::{Method, SessionManager};

/// Handle movie commands
pub async fn execute(action: MoviesAction, session: &SessionManager) -> Result<()> {
    match action {
        MoviesAction::List => list(session).await,
        MoviesAction::Add {
            title,
            director,
            genre,
            year,
            rating,
        } => {
            let draft = MovieDraft {
                title: Some(title),
                director,
                genre,
                year,
                rating,
            };
            add(session, draft).await
        }
        MoviesAction::Edit {
            id,
            title,
            director,
            genre,
            year,
            rating,
        } => {
            let draft = MovieDraft {
                title,
                director,
                genre,
                year,
                rating,
            };
            edit(session, &id, draft).await
        }
        MoviesAction::Rm { id, force } => rm(session, &id, force).await,
    }
}

async fn list(session: &SessionManager) -> Result<()> {
    let Some(movies) = session
        .request::<Vec<Movie>>(Method::GET, "/movies", None)
        .await
    else {
        return Ok(());
    };

    if movies.is_empty() {
        println!(
            "No movies yet. Add one with {}.",
            "watchlog movies add".cyan()
        );
        return Ok(());
    }

    for movie in &movies {
        print_movie(movie);
    }
    Ok(())
}

async fn add(session: &SessionManager, draft: MovieDraft) -> Result<()> {
    if draft.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
        println!("{} Title is required.", "✗".red());
        return Ok(());
    }
    if !rating_valid(&draft) {
        return Ok(());
    }

    let body = serde_json::to_value(&draft)?;
    let Some(envelope) = session
        .request::<MovieEnvelope>(Method::POST, "/movies", Some(body))
        .await
    else {
        return Ok(());
    };

    println!("{} Added {}", "✓".green(), envelope.movie.title.bold());
    Ok(())
}

async fn edit(session: &SessionManager, id: &str, draft: MovieDraft) -> Result<()> {
    if draft.is_empty() {
        println!("{} Nothing to change.", "✗".red());
        return Ok(());
    }
    if !rating_valid(&draft) {
        return Ok(());
    }

    let body = serde_json::to_value(&draft)?;
    let Some(envelope) = session
        .request::<MovieEnvelope>(Method::PATCH, &format!("/movies/{id}"), Some(body))
        .await
    else {
        return Ok(());
    };

    println!("{} Updated {}", "✓".green(), envelope.movie.title.bold());
    print_movie(&envelope.movie);
    Ok(())
}

async fn rm(session: &SessionManager, id: &str, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete movie {id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    // A 204 also lands on None; the server said nothing, so neither do we.
    let Some(_) = session
        .request::<serde_json::Value>(Method::DELETE, &format!("/movies/{id}"), None)
        .await
    else {
        return Ok(());
    };

    println!("{} Deleted movie {id}", "✓".green());
    Ok(())
}

fn rating_valid(draft: &MovieDraft) -> bool {
    if let Some(rating) = draft.rating {
        if !(1..=10).contains(&rating) {
            println!("{} Rating must be between 1 and 10.", "✗".red());
            return false;
        }
    }
    true
}

fn print_movie(movie: &Movie) {
    let mut details = Vec::new();
    if let Some(year) = movie.year {
        details.push(year.to_string());
    }
    if let Some(ref director) = movie.director {
        details.push(format!("dir. {director}"));
    }
    if let Some(ref genre) = movie.genre {
        details.push(genre.clone());
    }

    let rating = movie
        .rating
        .map(|r| format!("  {}", format!("{r}/10").yellow()))
        .unwrap_or_default();

    println!(
        "{:>8}  {}{rating}  {}",
        movie.id_display().dimmed(),
        movie.title.bold(),
        details.join(" | ").dimmed()
    );
}
