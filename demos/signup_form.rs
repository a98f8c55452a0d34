//! Signup Form
//!
//! This example walks a signup form through its lifecycle.
//!
//! Key concepts:
//! - Rules declared as JSON and bound to typed field keys
//! - Seeding values and errors before the user types
//! - Errors stay hidden until the first save, then follow every keystroke
//! - Saving a half-filled form and restoring it later
//!
//! Run with: cargo run --example signup_form

use formstate::checkpoint::FormSnapshot;
use formstate::config::RulesConfig;
use formstate::core::FieldKey;
use formstate::field::InputEvent;
use formstate::field_keys;
use formstate::form::FormController;

field_keys! {
    enum Signup {
        Name = "name",
        Phone = "phone",
        Email = "email",
    }
}

const RULES: &str = r#"{
    "name": { "test": "required", "message": "name is required" },
    "phone": { "test": { "regex": "^[0-9]{5,10}$" }, "message": "phone is not valid" },
    "email": { "test": ["required", "email"], "message": "email is not valid" }
}"#;

// Simulates a text widget emitting a change event
fn type_into(form: &FormController<Signup>, key: Signup, text: &str) {
    println!("  typing {:?} into {}", text, key.name());
    form.fields()[&key].on_change(InputEvent::new(text));
}

fn render(form: &FormController<Signup>) {
    for (key, field) in form.fields() {
        match field.helper_text().filter(|_| field.error()) {
            Some(message) => println!("  {:<6} {:<20} <- {}", key.name(), field.value(), message),
            None => println!("  {:<6} {}", key.name(), field.value()),
        }
    }
}

fn save(form: &FormController<Signup>) {
    match form.validate() {
        Some(values) => println!("  saved: {:?}", values),
        None => println!("  not saved, {} field(s) need attention", form.errors().len()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Signup Form Example ===\n");

    let form: FormController<Signup> = RulesConfig::from_json(RULES)?.into_builder()?.build()?;

    println!("Step 1: Seed values and errors");
    println!("----------------------------------------");
    form.set_values([(Signup::Name, "Some invalid name")]);
    form.set_errors([(Signup::Name, "Name is not valid")]);
    render(&form);
    println!();

    println!("Step 2: Type before saving (no errors shown)");
    println!("----------------------------------------");
    type_into(&form, Signup::Email, "not-an-email");
    render(&form);
    println!();

    println!("Step 3: First save");
    println!("----------------------------------------");
    save(&form);
    render(&form);
    println!();

    println!("Step 4: Type after saving (validated live)");
    println!("----------------------------------------");
    type_into(&form, Signup::Phone, "1234");
    type_into(&form, Signup::Phone, "12345");
    render(&form);
    println!();

    println!("Step 5: Save and restore a half-filled form");
    println!("----------------------------------------");
    let json = form.snapshot().to_json()?;
    let resumed: FormController<Signup> = RulesConfig::from_json(RULES)?.into_builder()?.build()?;
    resumed.restore(&FormSnapshot::from_json(&json)?)?;
    type_into(&resumed, Signup::Email, "ann@example.com");
    save(&resumed);
    render(&resumed);

    println!("\nKey Takeaways:");
    println!("- Rules are data; typed keys make undeclared fields unrepresentable");
    println!("- The first save turns on live validation for every field");
    println!("- Snapshots carry values, errors and the form's phase");

    Ok(())
}
