// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use expensa::application::ExpenseService;
use expensa::domain::{Category, PaymentMethod};

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: the three expenses from the March/April walkthrough
/// (Food 100.00, Transport 50.00, Food 20.00)
pub fn standard_session() -> Result<ExpenseService> {
    let mut service = ExpenseService::new();
    service.add_expense(
        parse_date("2025-03-01"),
        Category::Food,
        10000,
        None,
        PaymentMethod::Cash,
    )?;
    service.add_expense(
        parse_date("2025-03-02"),
        Category::Transport,
        5000,
        None,
        PaymentMethod::Upi,
    )?;
    service.add_expense(
        parse_date("2025-04-01"),
        Category::Food,
        2000,
        None,
        PaymentMethod::Cash,
    )?;
    Ok(service)
}

/// Test fixture: a busier month with notes, ties and several payment methods
pub fn varied_session() -> Result<ExpenseService> {
    let mut service = ExpenseService::new();
    let entries = [
        ("2025-01-03", Category::Bills, 120000, "January rent", PaymentMethod::Upi),
        ("2025-01-05", Category::Food, 45050, "Weekly groceries", PaymentMethod::DebitCard),
        ("2025-01-05", Category::Entertainment, 9900, "Cinema", PaymentMethod::CreditCard),
        ("2025-01-12", Category::Food, 45050, "Weekly groceries", PaymentMethod::DebitCard),
        ("2025-01-20", Category::Transport, 2500, "Metro card", PaymentMethod::Cash),
        ("2025-02-01", Category::Shopping, 0, "Gift card redeemed", PaymentMethod::Other),
        ("2025-02-14", Category::Other, 15000, "", PaymentMethod::Cash),
    ];
    for (date, category, amount, notes, method) in entries {
        service.add_expense(
            parse_date(date),
            category,
            amount,
            Some(notes.to_string()),
            method,
        )?;
    }
    Ok(service)
}
