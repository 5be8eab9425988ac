use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_post = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_post, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_post:?}"
    );
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    for input in form.select(&Selector::parse("input").unwrap()) {
        let input_name = input.value().attr("name").unwrap_or_default();

        if input_name == name {
            let input_type = input.value().attr("type").unwrap_or_default();

            assert_eq!(
                input_type, type_,
                "want input with type \"{type_}\", got {input_type:?}"
            );

            return;
        }
    }

    panic!("No input found with name \"{name}\" and type \"{type_}\"");
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    form.select(&Selector::parse("button[type=submit]").unwrap())
        .next()
        .expect("want submit button with type=\"submit\"");
}

/// Checks the form-level error paragraph, the one whose id ends in "-error".
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let p = Selector::parse("p[id$='-error']").unwrap();
    let error_message = form
        .select(&p)
        .next()
        .expect("No error message found")
        .text()
        .collect::<Vec<_>>()
        .join("");
    let got_error_message = error_message.trim();

    assert_eq!(want_error_message, got_error_message);
}

/// The validation message shown under the field called `name`, if any.
///
/// Fields are rendered as a `div` holding the label, the field and an
/// optional `p` with the message.
#[track_caller]
pub(crate) fn field_error(form: &ElementRef<'_>, name: &str) -> Option<String> {
    let field = form
        .select(&Selector::parse(&format!("[name={name}]")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No field found with name \"{name}\""));
    let container = field
        .parent()
        .and_then(ElementRef::wrap)
        .unwrap_or_else(|| panic!("Field \"{name}\" has no parent element"));

    container
        .select(&Selector::parse("p").unwrap())
        .next()
        .map(|p| p.text().collect::<String>().trim().to_owned())
}
