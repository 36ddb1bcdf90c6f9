//! Interactive session
//!
//! Each input line is parsed into a `Command`. Selection changes become
//! `Event`s on a single `CalculatorState`; failures are printed and the
//! loop carries on.

use crate::display;
use carbon_common::subscription::SUBSCRIBED_MESSAGE;
use carbon_common::{
    display_category, CalculatorState, CarbonClient, Event, SubscriptionForm,
};
use std::io::{BufRead, Write};

const HELP: &str = "\
[COMMANDS]
  categories          list categories
  category <name>     select a category (resets the activity)
  activities          list activities of the selected category
  activity <key>      select an activity
  quantity <n>        set the quantity
  calculate           send the calculation
  subscribe <email>   subscribe for weekly tips
  show                show current selection and result
  help                this text
  quit                leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Categories,
    Activities,
    Apply(Event),
    Calculate,
    Subscribe(String),
    Show,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let needs_arg = |name: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("'{}' needs an argument", name))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_lowercase().as_str() {
        "categories" => Command::Categories,
        "activities" => Command::Activities,
        "category" => Command::Apply(Event::SelectCategory(needs_arg("category")?)),
        "activity" => Command::Apply(Event::SelectActivity(needs_arg("activity")?)),
        // An empty quantity is a valid state; calculate will reject it
        "quantity" => Command::Apply(Event::SetQuantity(rest.to_string())),
        "calculate" | "calc" => Command::Calculate,
        "subscribe" => Command::Subscribe(needs_arg("subscribe")?),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(Some(command))
}

fn render_selection(state: &CalculatorState) -> String {
    let mut out = String::from("[SELECTION]\n");
    out.push_str(&format!(
        "  Category: {}\n",
        state
            .selected_category()
            .map(display_category)
            .unwrap_or_else(|| "-".to_string())
    ));

    let activity = state.selected_activity().and_then(|key| {
        state
            .category_activities()
            .get(key)
            .map(|a| (a.name.clone(), a.description.clone(), a.unit_suffix().to_string()))
    });
    match activity {
        Some((name, description, suffix)) => {
            out.push_str(&format!("  Activity: {}\n", name));
            out.push_str(&format!("            {}\n", description));
            out.push_str(&format!(
                "  Quantity: {} ({})\n",
                if state.quantity().is_empty() { "-" } else { state.quantity() },
                suffix
            ));
        }
        None => {
            out.push_str("  Activity: -\n");
            out.push_str(&format!("  Quantity: {}\n", state.quantity()));
        }
    }
    if let Some(error) = state.error() {
        out.push_str(&display::error_line(error));
        out.push('\n');
    }
    out
}

/// Run the session until `quit` or end of input
pub async fn run_session<R, W>(
    client: &CarbonClient,
    user_email: Option<&str>,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut state = CalculatorState::new();
    let mut form = SubscriptionForm::new();

    let load = match client.fetch_catalog().await {
        Ok(catalog) => Event::CatalogLoaded(catalog),
        Err(e) => Event::CatalogFailed(e.to_string()),
    };
    let _ = state.handle(load);
    write!(out, "{}", render_selection(&state))?;
    writeln!(out, "Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{}", display::error_line(&message))?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Show => {
                write!(out, "{}", render_selection(&state))?;
                if let Some(view) = state.result_view() {
                    write!(out, "{}", display::render_result(&view))?;
                }
            }
            Command::Categories => write!(out, "{}", display::render_categories(state.catalog()))?,
            Command::Activities => match state.selected_category() {
                Some(category) => write!(
                    out,
                    "{}",
                    display::render_activity_set(category, &state.category_activities())
                )?,
                None => writeln!(out, "{}", display::error_line("No category selected"))?,
            },
            Command::Apply(event) => {
                if let Err(e) = state.handle(event) {
                    writeln!(out, "{}", display::error_line(&e.to_string()))?;
                }
            }
            Command::Calculate => match state.calculate(client, user_email).await {
                Ok(view) => write!(out, "{}", display::render_result(&view))?,
                Err(e) => writeln!(out, "{}", display::error_line(&e.user_message()))?,
            },
            Command::Subscribe(email) => {
                form.set_email(email);
                match form.submit(client).await {
                    Ok(_) => writeln!(out, "{}", display::ok_line(SUBSCRIBED_MESSAGE))?,
                    Err(e) => writeln!(out, "{}", display::error_line(&e.user_message()))?,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("  "), Ok(None));
        assert_eq!(parse_line("calc"), Ok(Some(Command::Calculate)));
        assert_eq!(
            parse_line("category  food "),
            Ok(Some(Command::Apply(Event::SelectCategory("food".into()))))
        );
        assert_eq!(
            parse_line("quantity 12.5"),
            Ok(Some(Command::Apply(Event::SetQuantity("12.5".into()))))
        );
        assert_eq!(
            parse_line("subscribe a@b.io"),
            Ok(Some(Command::Subscribe("a@b.io".into())))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("category").is_err());
        assert!(parse_line("fly to mars").is_err());
    }

    #[tokio::test]
    async fn test_session_survives_errors() {
        let client = CarbonClient::new("http://127.0.0.1:9");
        let input = b"bogus\nquantity abc\ncalculate\nsubscribe not-an-email\nshow\nquit\ncalculate\n";
        let mut out = Vec::new();

        run_session(&client, None, &input[..], &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Failed to load activities"));
        assert!(text.contains("Unknown command 'bogus'"));
        assert!(text.contains("Please select an activity and enter a quantity"));
        assert!(text.contains("Please enter a valid email address"));
        assert!(text.contains("[SELECTION]"));
    }
}
