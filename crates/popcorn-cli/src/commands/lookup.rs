use crate::output::Output;
use crate::render;
use crate::ui::Spinner;
use color_eyre::Result;
use popcorn_core::ViewController;
use serde_json::json;

/// One-shot search: run the query to completion and print the results.
pub async fn run_search(mut controller: ViewController, query: &str, output: &Output) -> Result<()> {
    controller.set_query(query);
    let spinner = Spinner::start(output, format!("Searching for \"{}\"...", query));
    controller.settle().await;
    spinner.finish();

    let state = controller.search_state();
    if let Some(error) = &state.error {
        output.error(error);
        return Err(color_eyre::eyre::eyre!("{}", error));
    }

    if state.query.chars().count() < controller.min_query_length() {
        output.warn(format!(
            "Queries need at least {} characters",
            controller.min_query_length()
        ));
        return Ok(());
    }

    output.json(&json!({ "query": state.query, "results": state.movies }));
    output.block(render::found_line(state.result_count()));
    output.block(render::results_table(&state.movies).to_string());
    Ok(())
}

/// One-shot detail view for an identifier.
pub async fn run_show(mut controller: ViewController, imdb_id: &str, output: &Output) -> Result<()> {
    controller.select(imdb_id);
    let spinner = Spinner::start(output, format!("Loading {}...", imdb_id));
    controller.settle().await;
    spinner.finish();

    let state = controller.detail_state();
    match (state.current(), &state.error) {
        (Some(detail), _) => {
            output.json(&json!({ "detail": detail }));
            output.block(render::detail_block(detail, controller.watched_user_rating(imdb_id)));
            Ok(())
        }
        (None, Some(error)) => {
            output.error(error);
            Err(color_eyre::eyre::eyre!("{}", error))
        }
        (None, None) => Err(color_eyre::eyre::eyre!("No details returned for {}", imdb_id)),
    }
}
