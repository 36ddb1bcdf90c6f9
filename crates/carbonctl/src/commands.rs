//! One-shot command implementations

use crate::display;
use carbon_common::subscription::SUBSCRIBED_MESSAGE;
use carbon_common::{
    CalculatorState, CarbonClient, CarbonError, Event, SubscriptionForm, ValidationError,
};
use tracing::debug;

/// Fetch the catalog into a fresh calculator state
pub async fn load_state(client: &CarbonClient) -> Result<CalculatorState, CarbonError> {
    let catalog = client.fetch_catalog().await?;
    let mut state = CalculatorState::new();
    state.handle(Event::CatalogLoaded(catalog))?;
    Ok(state)
}

pub async fn activities(
    client: &CarbonClient,
    category: Option<String>,
    json: bool,
) -> Result<(), CarbonError> {
    let catalog = client.fetch_catalog().await?;

    match category {
        Some(category) => {
            let set = catalog
                .activities(&category)
                .ok_or_else(|| ValidationError::UnknownCategory(category.clone()))?;
            if json {
                print_json(set);
            } else {
                print!("{}", display::render_activity_set(&category, set));
            }
        }
        None if json => print_json(&catalog),
        None => println!("{}", display::render_catalog(&catalog)),
    }
    Ok(())
}

pub async fn categories(client: &CarbonClient) -> Result<(), CarbonError> {
    let catalog = client.fetch_catalog().await?;
    print!("{}", display::render_categories(&catalog));
    Ok(())
}

/// Options for `carbonctl calculate`
#[derive(Debug, Clone, Default)]
pub struct CalculateArgs {
    pub category: Option<String>,
    pub activity: Option<String>,
    pub quantity: String,
    pub email: Option<String>,
    pub json: bool,
}

/// Selections follow the same rules as the interactive form. Without
/// `--activity` the first activity of the chosen (or first) category is
/// used; an activity given without `--category` is looked up across all
/// categories.
pub async fn calculate(client: &CarbonClient, args: CalculateArgs) -> Result<(), CarbonError> {
    let mut state = load_state(client).await?;

    let explicit_category = args.category.is_some();
    if let Some(category) = args.category {
        state.handle(Event::SelectCategory(category))?;
    }
    if let Some(activity) = args.activity {
        if !explicit_category && !state.category_activities().contains(&activity) {
            let owner = state
                .catalog()
                .find(&activity)
                .map(|(category, _)| category.to_string())
                .ok_or_else(|| ValidationError::UnknownActivity(activity.clone()))?;
            state.handle(Event::SelectCategory(owner))?;
        }
        state.handle(Event::SelectActivity(activity))?;
    }
    state.handle(Event::SetQuantity(args.quantity))?;

    debug!(
        "Calculating {:?} x {}",
        state.selected_activity(),
        state.quantity()
    );
    let view = state.calculate(client, args.email.as_deref()).await?;

    if args.json {
        if let Some(result) = state.result() {
            print_json(&serde_json::json!({
                "result": result,
                "band": view.band.label(),
                "advisory": view.band.advisory(),
            }));
        }
    } else {
        print!("{}", display::render_result(&view));
    }
    Ok(())
}

pub async fn subscribe(client: &CarbonClient, email: String) -> Result<(), CarbonError> {
    let mut form = SubscriptionForm::new();
    form.set_email(email);
    form.submit(client).await?;
    println!("{}", display::ok_line(SUBSCRIBED_MESSAGE));
    Ok(())
}

pub async fn unsubscribe(client: &CarbonClient, email: String) -> Result<(), CarbonError> {
    let response = client.unsubscribe(&email).await?;
    println!("{}", display::ok_line(&response.message));
    Ok(())
}

pub async fn send_tip(client: &CarbonClient, email: String) -> Result<(), CarbonError> {
    let response = client.send_tip(&email).await?;
    println!("{}", display::ok_line(&response.message));
    Ok(())
}

pub async fn history(client: &CarbonClient, email: String) -> Result<(), CarbonError> {
    let records = client.history(&email).await?;
    print!("{}", display::render_history(&email, &records));
    Ok(())
}

pub async fn users(client: &CarbonClient) -> Result<(), CarbonError> {
    let users = client.users().await?;
    print!("{}", display::render_users(&users));
    Ok(())
}

pub async fn health(client: &CarbonClient) -> Result<(), CarbonError> {
    let health = client.health().await?;
    println!(
        "{}",
        display::ok_line(&format!("{} ({}): {}", client.base_url(), health.status, health.message))
    );
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("{}", display::error_line(&e.to_string())),
    }
}
