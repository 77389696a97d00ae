//! Interactive shell over one long-lived session.
//!
//! Filters are loaded once at startup; results stay on screen between
//! commands so products can be sent to the cart by their list number.

use std::io::Write;

use healthy_food_core::Store;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CommandError, Context};
use crate::render;

const HELP: &str = "\
Commands:
  search <query>         search the selected store
  store <kroger|heb>     select the store to search
  results                show the last results again
  filters                list active filters
  filter add <term>      add an ingredient filter
  filter remove <term>   remove an ingredient filter
  cart <n>               open result <n> on the retailer's site
  help                   show this help
  quit                   leave the shell";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Empty,
    Search(String),
    SelectStore(Store),
    Results,
    Filters,
    AddFilter(String),
    RemoveFilter(String),
    Cart(usize),
    Help,
    Quit,
}

fn parse(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    match word {
        "" => Ok(ShellCommand::Empty),
        "search" | "s" => Ok(ShellCommand::Search(rest.to_string())),
        "store" => rest.parse().map(ShellCommand::SelectStore),
        "results" | "r" => Ok(ShellCommand::Results),
        "filters" => Ok(ShellCommand::Filters),
        "filter" => {
            let (action, term) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, ""), |(a, t)| (a, t.trim()));
            match action {
                "add" => Ok(ShellCommand::AddFilter(term.to_string())),
                "remove" | "rm" => Ok(ShellCommand::RemoveFilter(term.to_string())),
                _ => Err("usage: filter add <term> | filter remove <term>".to_string()),
            }
        }
        "cart" => rest
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(ShellCommand::Cart)
            .ok_or_else(|| "usage: cart <result number>".to_string()),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command: {other} (try 'help')")),
    }
}

/// Run the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns error if reading input or writing output fails.
pub async fn run(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    ctx.orchestrator.start().await;
    writeln!(
        out,
        "Healthy Food Finder - {} filters active",
        ctx.orchestrator.session().filters().len()
    )?;
    writeln!(out, "{HELP}")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(out, "{}> ", ctx.orchestrator.store())?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => execute(ctx, out, command).await?,
            Err(message) => writeln!(out, "! {message}")?,
        }
    }
    Ok(())
}

async fn execute(
    ctx: &Context,
    out: &mut impl Write,
    command: ShellCommand,
) -> Result<(), CommandError> {
    let orchestrator = &ctx.orchestrator;
    match command {
        ShellCommand::Empty | ShellCommand::Quit => {}
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Search(query) => {
            if query.trim().is_empty() {
                writeln!(out, "! usage: search <query>")?;
                return Ok(());
            }
            let effects = orchestrator.search(&query).await;
            render::results(out, &orchestrator.session())?;
            render::effects(out, &effects)?;
        }
        ShellCommand::SelectStore(store) => {
            orchestrator.set_store(store);
            writeln!(out, "Searching {} from now on", store.display_name())?;
        }
        ShellCommand::Results => render::results(out, &orchestrator.session())?,
        ShellCommand::Filters => render::filters(out, &orchestrator.session())?,
        ShellCommand::AddFilter(term) => {
            let effects = orchestrator.add_filter(&term).await;
            render::effects(out, &effects)?;
            render::filters(out, &orchestrator.session())?;
        }
        ShellCommand::RemoveFilter(term) => {
            let effects = orchestrator.remove_filter(&term).await;
            render::effects(out, &effects)?;
            render::filters(out, &orchestrator.session())?;
        }
        ShellCommand::Cart(number) => {
            let product = orchestrator
                .session()
                .results()
                .get(number - 1)
                .cloned();
            let Some(product) = product else {
                writeln!(out, "! no result numbered {number}")?;
                return Ok(());
            };
            if product.cart_url().is_none() {
                writeln!(out, "! {} has no retailer page", product.name)?;
                return Ok(());
            }
            let effects = orchestrator.add_to_cart(&product).await;
            render::effects(out, &effects)?;
        }
    }
    Ok(())
}
