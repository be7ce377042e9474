//! Detail views for single entities and the dashboard.

use lorma_core::{Dashboard, Food, Order, Restaurant, Review, User};

use super::tables::{format_instant, format_optional, format_time, print_separator, truncate_string};

/// Print an account.
pub fn display_user(user: &User) {
    let profile = &user.profile;
    println!("Username: {}", user.username);
    println!("Role:     {}", user.role);
    println!("Name:     {}", profile.full_name());
    println!("Phone:    {}", profile.phone);
    println!("Email:    {}", profile.email);
    println!("Address:  {}", profile.address());
    if let Some(credit) = user.credit {
        println!("Credit:   € {credit}");
    }
}

/// Print a restaurant with its menu and the average of its reviews.
pub fn display_restaurant(restaurant: &Restaurant, menu: &[Food], reviews: &[Review]) {
    println!("{}", restaurant.name);
    println!("  Owner:  {}", restaurant.owner);
    println!("  VAT id: {}", restaurant.vat_id);
    println!(
        "  Hours:  {}-{}",
        format_time(restaurant.opening_time),
        format_time(restaurant.closing_time)
    );
    match average_vote(reviews) {
        Some(avg) => println!("  Rating: {avg:.1}/5 ({} review(s))", reviews.len()),
        None => println!("  Rating: no reviews yet"),
    }
    println!();
    print_menu(menu);
}

/// Print a menu as a table.
pub fn print_menu(menu: &[Food]) {
    if menu.is_empty() {
        println!("The menu is empty.");
        return;
    }
    println!("{:<5} {:<30} {:<15} {:>9}", "ID", "Item", "Type", "Price");
    print_separator(62);
    for food in menu {
        println!(
            "{:<5} {:<30} {:<15} {:>9}",
            food.id,
            truncate_string(&food.name, 29),
            truncate_string(&food.food_type.name, 14),
            format!("€ {}", food.price)
        );
    }
}

/// Print one order with its lines and totals.
pub fn display_order(order: &Order) {
    println!("Order #{} - {}", order.id, order.state);
    println!("  Restaurant:  {}", order.restaurant);
    println!("  Client:      {}", order.client);
    println!(
        "  Deliveryman: {}",
        format_optional(order.deliveryman.as_ref(), "--")
    );
    println!("  Placed:      {}", format_instant(order.created_at));
    if let Some(at) = order.accepted_at {
        println!("  Accepted:    {}", format_instant(at));
    }
    if let Some(at) = order.delivered_at {
        println!("  Delivered:   {}", format_instant(at));
    }
    if let Some(at) = order.cancelled_at {
        println!("  Cancelled:   {}", format_instant(at));
    }
    println!();
    println!("{:>4}  {:<30} {:>9} {:>10}", "Qty", "Item", "Each", "Total");
    print_separator(57);
    for line in &order.lines {
        let total = line
            .line_total()
            .map_or_else(|_| "--".to_string(), |t| format!("€ {t}"));
        println!(
            "{:>4}  {:<30} {:>9} {:>10}",
            line.quantity,
            truncate_string(&line.food.name, 29),
            format!("€ {}", line.food.price),
            total
        );
    }
    print_separator(57);
    println!("{:>46} {:>10}", "Shipping", format!("€ {}", order.shipping_rate));
    if let Ok(total) = order.total() {
        println!("{:>46} {:>10}", "Total", format!("€ {total}"));
    }
}

/// Print the admin dashboard.
pub fn display_dashboard(dashboard: &Dashboard) {
    const NONE: &str = "no data yet";

    println!("Dashboard");
    print_separator(60);
    println!(
        "Most ordered restaurant:  {}",
        dashboard
            .most_ordered_restaurant
            .as_ref()
            .map_or_else(|| NONE.to_string(), |r| format!("{} ({} orders)", r.restaurant, r.orders))
    );
    println!(
        "Lowest rated restaurant:  {}",
        dashboard.worst_rated_restaurant.as_ref().map_or_else(
            || NONE.to_string(),
            |r| format!("{} ({:.1}/5 over {} reviews)", r.restaurant, r.average_vote, r.reviews)
        )
    );
    println!(
        "Top deliveryman:          {}",
        dashboard.top_deliveryman.as_ref().map_or_else(
            || NONE.to_string(),
            |d| format!("{} ({} deliveries)", d.username, d.deliveries)
        )
    );
    println!(
        "Most purchased food:      {}",
        dashboard.most_purchased_food.as_ref().map_or_else(
            || NONE.to_string(),
            |f| format!("{} from {} (x{})", f.food.name, f.food.restaurant, f.quantity)
        )
    );
    println!(
        "Most purchased food type: {}",
        dashboard.most_purchased_food_type.as_ref().map_or_else(
            || NONE.to_string(),
            |t| format!("{} [{}] (x{})", t.food_type.name, t.food_type.macro_type, t.quantity)
        )
    );
}

#[allow(clippy::cast_precision_loss)]
fn average_vote(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.vote.value())).sum();
    Some(f64::from(sum) / reviews.len() as f64)
}
