//! The hospital-management test scripts.
//!
//! One async function per script, registered in [`hospital_suite`] in the
//! order they are meant to run.

use crate::pages::{
    LAB_NOTIFICATION_COLUMN, LAB_NOTIFICATION_TABLE, STAR_TOOLTIP_COLUMN, TOOLTIP_TABLE,
};
use crate::result::MedResult;
use crate::suite::{Precondition, Scenario, ScenarioContext, Suite};
use futures::FutureExt;

/// Banner text after a rejected sign-in
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials !";

/// Validation message for a lab test without a code
pub const LAB_CODE_REQUIRED_MESSAGE: &str = "Lab Test Code Required.";

/// Notice after a from-date later than the to-date
pub const DATE_RANGE_NOTICE: &str = "Date is not between Range. Please enter again";

/// Every script, in run order
#[must_use]
pub fn hospital_suite() -> Suite {
    use Precondition::{SignedIn, SignedOut};

    Suite::new("hospital")
        .scenario(Scenario::new("TS-1 Login with valid credentials from Excel", SignedOut, |ctx| {
            login_with_valid_credentials(ctx).boxed()
        }))
        .scenario(Scenario::new(
            "TS-2 Verify Page Navigation and Load Time for Billing Counter",
            SignedIn,
            |ctx| billing_counter_load(ctx).boxed(),
        ))
        .scenario(Scenario::new("TS-3 Patient Search with Valid Data", SignedIn, |ctx| {
            patient_search_with_valid_data(ctx).boxed()
        }))
        .scenario(Scenario::new("TS-4 Activate Counter in Dispensary", SignedIn, |ctx| {
            activate_dispensary_counter(ctx).boxed()
        }))
        .scenario(Scenario::new("TS-5 Purchase Request List Load", SignedIn, |ctx| {
            purchase_request_list_load(ctx).boxed()
        }))
        .scenario(Scenario::new(
            "TS-6 Verify error message while adding new lab test in Laboratory",
            SignedIn,
            |ctx| lab_test_error_message(ctx).boxed(),
        ))
        .scenario(Scenario::new("TS-7 Handle Alert on Radiology Module", SignedIn, |ctx| {
            radiology_alert(ctx).boxed()
        }))
        .scenario(Scenario::new("TS-8 Data-Driven Testing for Patient Search", SignedIn, |ctx| {
            data_driven_patient_search(ctx).boxed()
        }))
        .scenario(Scenario::new(
            "TS-9 Error Handling and Logging in Purchase Request List",
            SignedIn,
            |ctx| purchase_request_filter_notice(ctx).boxed(),
        ))
        .scenario(Scenario::new(
            "TS-10 Keyword-Driven Framework for Appointment Search",
            SignedIn,
            |ctx| keyword_driven_appointment_search(ctx).boxed(),
        ))
        .scenario(Scenario::new("TS-11 Modular Script for Patient Search", SignedIn, |ctx| {
            modular_patient_search(ctx).boxed()
        }))
        .scenario(
            Scenario::new("TS-12 Verify Assertion for Counter Activation", SignedIn, |ctx| {
                counter_activation_soft(ctx).boxed()
            })
            .soft(),
        )
        .scenario(Scenario::new(
            "TS-14 Verify Locator Strategy for Appointment Search",
            SignedIn,
            |ctx| appointment_list_locators(ctx).boxed(),
        ))
        .scenario(Scenario::new(
            "TS-15 Verify the tooltip text on hover of Star icon in Laboratory",
            SignedIn,
            |ctx| star_icon_tooltip(ctx).boxed(),
        ))
        .scenario(Scenario::new(
            "TS-16 Navigation Exception Handling on Dispensary Page",
            SignedIn,
            |ctx| dispensary_navigation(ctx).boxed(),
        ))
        .scenario(Scenario::new(
            "TS-17 Web Element Handling for Dropdowns in Purchase Request",
            SignedIn,
            |ctx| purchase_request_date_dropdown(ctx).boxed(),
        ))
        .scenario(Scenario::new("TS-18 Login with invalid credentials", SignedIn, |ctx| {
            login_with_invalid_credentials(ctx).boxed()
        }))
}

async fn login_with_valid_credentials(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx.pages().login.perform_login().await;
    ctx.expect_true(ctx.flag(result, "perform_login"), "login to succeed")
}

async fn billing_counter_load(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx.pages().utilities.verify_billing_counter_load_state().await;
    ctx.expect_true(
        ctx.flag(result, "verify_billing_counter_load_state"),
        "billing counters to load",
    )
}

async fn patient_search_with_valid_data(ctx: &ScenarioContext) -> MedResult<()> {
    let appointment = &ctx.pages().appointment;
    appointment.navigate_to_appointment_page().await?;
    let name = appointment.select_first_patient().await?;
    appointment.search_patient(&name).await?;
    appointment.verify_patient_name(&name).await
}

async fn activate_dispensary_counter(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx
        .pages()
        .dispensary
        .verify_active_counter_message_in_dispensary()
        .await;
    ctx.expect_true(
        ctx.flag(result, "verify_active_counter_message_in_dispensary"),
        "dispensary counter to activate",
    )
}

async fn purchase_request_list_load(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx
        .pages()
        .procurement
        .verify_purchase_request_list_elements()
        .await;
    ctx.expect_true(
        ctx.flag(result, "verify_purchase_request_list_elements"),
        "purchase request list controls to show",
    )
}

async fn lab_test_error_message(ctx: &ScenarioContext) -> MedResult<()> {
    match ctx
        .session()
        .fixture_value(LAB_NOTIFICATION_TABLE, LAB_NOTIFICATION_COLUMN)
    {
        Ok(text) => tracing::info!(%text, "lab notification text"),
        Err(e) => tracing::warn!(error = %e, "lab notification text unavailable"),
    }
    let message = ctx.pages().laboratory.verify_error_message().await?;
    ctx.expect_eq(message.as_str(), LAB_CODE_REQUIRED_MESSAGE, "lab test error message")
}

async fn radiology_alert(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx
        .pages()
        .radiology
        .perform_radiology_request_and_handle_alert()
        .await;
    ctx.expect_true(
        ctx.flag(result, "perform_radiology_request_and_handle_alert"),
        "radiology alert to be handled",
    )
}

async fn data_driven_patient_search(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx.pages().patient.search_and_verify_patients().await;
    ctx.expect_true(
        ctx.flag(result, "search_and_verify_patients"),
        "every patient search to match",
    )
}

async fn purchase_request_filter_notice(ctx: &ScenarioContext) -> MedResult<()> {
    let notice = ctx
        .pages()
        .procurement
        .verify_notice_message_after_entering_incorrect_filters()
        .await?;
    ctx.expect_eq(notice.as_str(), DATE_RANGE_NOTICE, "purchase request filter notice")
}

async fn keyword_driven_appointment_search(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx.pages().appointment.search_and_verify_patient().await;
    ctx.expect_true(
        ctx.flag(result, "search_and_verify_patient"),
        "appointment search to match",
    )
}

async fn modular_patient_search(ctx: &ScenarioContext) -> MedResult<()> {
    let pages = ctx.pages();
    let result = pages.appointment.search_patient_in_appointment().await;
    ctx.expect_true(
        ctx.flag(result, "search_patient_in_appointment"),
        "appointment search to succeed",
    )?;
    let result = pages.patient.search_patient_in_patient_page().await;
    ctx.expect_true(
        ctx.flag(result, "search_patient_in_patient_page"),
        "patient page search to succeed",
    )?;
    let result = pages.adt.search_patient_in_adt().await;
    ctx.expect_true(ctx.flag(result, "search_patient_in_adt"), "ADT search to succeed")
}

async fn counter_activation_soft(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx.pages().dispensary.verify_counter_is_activated().await;
    ctx.soft_expect_true(
        ctx.flag(result, "verify_counter_is_activated"),
        "dispensary counter to be active",
    );
    Ok(())
}

async fn appointment_list_locators(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx.pages().appointment.search_and_verify_patient_list().await;
    ctx.expect_true(
        ctx.flag(result, "search_and_verify_patient_list"),
        "every listed appointment row to match",
    )
}

async fn star_icon_tooltip(ctx: &ScenarioContext) -> MedResult<()> {
    let expected = ctx
        .session()
        .fixture_value(TOOLTIP_TABLE, STAR_TOOLTIP_COLUMN)?;
    tracing::info!(%expected, "tooltip text from fixture");
    let tooltip = ctx.pages().laboratory.verify_star_tooltip().await?;
    ctx.expect_eq(tooltip.as_str(), expected.trim(), "star icon tooltip")
}

async fn dispensary_navigation(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx.pages().dispensary.navigate_to_dispensary().await;
    ctx.expect_true(
        ctx.flag(result, "navigate_to_dispensary"),
        "dispensary to open",
    )
}

async fn purchase_request_date_dropdown(ctx: &ScenarioContext) -> MedResult<()> {
    let result = ctx
        .pages()
        .procurement
        .verify_requested_date_column_date_within_range()
        .await;
    ctx.expect_true(
        ctx.flag(result, "verify_requested_date_column_date_within_range"),
        "request dates to lie within the chosen range",
    )
}

async fn login_with_invalid_credentials(ctx: &ScenarioContext) -> MedResult<()> {
    let message = ctx
        .pages()
        .login
        .perform_login_with_invalid_credentials()
        .await?;
    ctx.expect_eq(message.as_str(), INVALID_CREDENTIALS_MESSAGE, "login error message")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order() {
        let suite = hospital_suite();
        let ids: Vec<&str> = suite
            .scenario_names()
            .into_iter()
            .map(|name| name.split_whitespace().next().unwrap_or_default())
            .collect();
        assert_eq!(
            ids,
            vec![
                "TS-1", "TS-2", "TS-3", "TS-4", "TS-5", "TS-6", "TS-7", "TS-8", "TS-9", "TS-10",
                "TS-11", "TS-12", "TS-14", "TS-15", "TS-16", "TS-17", "TS-18"
            ]
        );
    }
}
