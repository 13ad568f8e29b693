//! Server-rendered form page.

use crate::{
    models::{DocumentFormat, Gender, UserQuery, MAX_AGE},
    services::FormOutcome,
};
use std::fmt::Write;

const PAGE_TITLE: &str = "Smart Yoga Asana Recommendation System";

const STYLE: &str = r#"
body { background-color: #34cafe; font-family: sans-serif; margin: 0; min-height: 100vh; }
main { max-width: 720px; margin: 0 auto; padding: 2rem; }
label { display: block; margin-top: 1rem; font-weight: bold; }
input[type=number], input[type=email], select, textarea { width: 100%; padding: 0.4rem; box-sizing: border-box; }
fieldset { margin-top: 1rem; border: none; padding: 0; }
button { margin-top: 1.5rem; padding: 0.6rem 1.2rem; }
.banner { margin-top: 1.5rem; padding: 0.8rem; border-radius: 4px; }
.success { background: #d4edda; }
.info { background: #d1ecf1; }
.warning { background: #fff3cd; }
.error { background: #f8d7da; }
"#;

/// Render the page, echoing the submitted values and the outcome when
/// there is one.
pub fn render_page(query: Option<&UserQuery>, outcome: Option<&FormOutcome>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n<main>\n\
         <h1>{title}</h1>\n\
         <p>Get personalized yoga recommendations based on your health needs.</p>\n",
        title = PAGE_TITLE,
        style = STYLE
    );

    render_form(&mut html, query);

    if let Some(outcome) = outcome {
        render_outcome(&mut html, outcome);
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, query: Option<&UserQuery>) {
    let age = query.map(|q| q.age).unwrap_or(0);
    let gender = query.map(|q| q.gender).unwrap_or(Gender::Male);
    let health_issue = query.map(|q| q.health_issue.as_str()).unwrap_or("");
    let email = query.map(|q| q.email.as_str()).unwrap_or("");
    let format = query.map(|q| q.format).unwrap_or_default();

    let _ = write!(
        html,
        "<form method=\"post\" action=\"/\">\n\
         <label for=\"age\">Enter your age:</label>\n\
         <input type=\"number\" id=\"age\" name=\"age\" min=\"0\" max=\"{max_age}\" step=\"1\" value=\"{age}\" required>\n\
         <label for=\"gender\">Select your gender:</label>\n\
         <select id=\"gender\" name=\"gender\">\n",
        max_age = MAX_AGE,
        age = age
    );
    for option in Gender::ALL {
        let selected = if option == gender { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            option.as_str(),
            selected
        );
    }

    let _ = write!(
        html,
        "</select>\n\
         <label for=\"health_issue\">Describe your health issue:</label>\n\
         <textarea id=\"health_issue\" name=\"health_issue\" rows=\"4\">{health_issue}</textarea>\n\
         <label for=\"email\">Enter your email address:</label>\n\
         <input type=\"email\" id=\"email\" name=\"email\" value=\"{email}\">\n\
         <fieldset>\n<legend>Select the file format to receive recommendations:</legend>\n",
        health_issue = escape_html(health_issue),
        email = escape_html(email)
    );
    for option in DocumentFormat::ALL {
        let checked = if option == format { " checked" } else { "" };
        let _ = writeln!(
            html,
            "<label><input type=\"radio\" name=\"format\" value=\"{0}\"{1}> {0}</label>",
            option.label(),
            checked
        );
    }
    html.push_str("</fieldset>\n<button type=\"submit\">Get Recommendations</button>\n</form>\n");
}

fn render_outcome(html: &mut String, outcome: &FormOutcome) {
    match outcome {
        FormOutcome::Warning(message) => banner(html, "warning", message),
        FormOutcome::NoMatches => banner(html, "info", "No matching asanas found for the given input."),
        FormOutcome::Failed(message) => banner(html, "error", message),
        FormOutcome::Sent { .. } => {
            render_recommendations(html, outcome);
            banner(html, "success", "Recommendations sent to your email!");
        }
        FormOutcome::DeliveryFailed { error, .. } => {
            render_recommendations(html, outcome);
            banner(html, "error", error);
        }
    }
}

fn render_recommendations(html: &mut String, outcome: &FormOutcome) {
    html.push_str("<h3>Recommended Yoga Asanas:</h3>\n<ul>\n");
    for recommendation in outcome.recommendations() {
        let _ = writeln!(html, "<li>{}</li>", escape_html(recommendation.as_str()));
    }
    html.push_str("</ul>\n");
}

fn banner(html: &mut String, class: &str, message: &str) {
    let _ = writeln!(
        html,
        "<div class=\"banner {}\">{}</div>",
        class,
        escape_html(message)
    );
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
