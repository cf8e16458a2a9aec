#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Basic filling example demonstrating core features of `typefill_fillers`.
//!
//! This example shows how to:
//! - Configure a scalar filler with a checking style, coercers and validators
//! - Drive a fill run one intent at a time and inspect each suspension
//! - Derive fillers from declared shapes, including optional (union) shapes
//! - Fill a raw JSON record field by field and extract native Rust values

use serde_json::json;
use typefill_fillers::{
    BindContext, FillStep, Filler, FillerError, ScalarFiller, ShapedFiller, TypeCheckStyle,
    ValidationError, ValidationToken, coercers, validators,
};
use typefill_shapes::TypeShape;
use typefill_values::Value;

/// Builds the filler used throughout the example: an integer field that
/// accepts numeric strings and rejects negative quantities.
fn quantity_filler() -> Result<ScalarFiller, FillerError> {
    let mut filler = ScalarFiller::of(TypeShape::Int)
        .with_style(TypeCheckStyle::Check)
        .with_coercer(coercers::parse_int())
        .with_validator(ValidationToken::func(|value| match value.as_i64() {
            Some(raw) if raw >= 0 => Ok(value),
            Some(raw) => Err(ValidationError::Rejected(format!("{raw} is negative"))),
            None => Err(ValidationError::Rejected("expected an integer".into())),
        }));
    filler.bind(&BindContext::new("Order", "quantity"))?;
    Ok(filler)
}

/// Demonstrates the staged pipeline on a range of inputs.
fn demonstrate_staged_filling() -> Result<(), FillerError> {
    println!("\n=== Staged Filling ===");

    let filler = quantity_filler()?;

    for value in [
        Value::Int(5),
        Value::from("5"),
        Value::from("-5"),
        Value::from(vec![1]),
    ] {
        match filler.fill(value.clone()).finish() {
            Ok(filled) => println!("  {value:?} filled as {filled:?}"),
            Err(error) => println!("  {value:?} rejected: {error}"),
        }
    }

    Ok(())
}

/// Demonstrates driving a run intent by intent instead of calling `finish`.
fn demonstrate_stepping() -> Result<(), FillerError> {
    println!("\n=== Stepping Through a Run ===");

    let filler = quantity_filler()?;
    let mut run = filler.fill(Value::from("12"));

    loop {
        match run.step()? {
            FillStep::Suspended { intent, run: next } => {
                println!("  suspended before {intent}");
                run = next;
            }
            FillStep::Complete { value } => {
                println!("  completed with {value:?}");
                break;
            }
        }
    }

    Ok(())
}

/// Demonstrates deriving fillers straight from declared shapes.
fn demonstrate_shape_derived_fillers() -> Result<(), FillerError> {
    println!("\n=== Shape-Derived Fillers ===");

    let shape = TypeShape::List(Box::new(TypeShape::Int));
    let mut item_ids = ShapedFiller::for_shape(&shape);
    item_ids.bind(&BindContext::new("Cart", "item_ids"))?;

    let filled = item_ids
        .fill(Value::from(vec![Value::Int(3), Value::Int(7)]))
        .finish()?;
    println!("  {shape} accepted {filled:?}");

    let mut coupon = ShapedFiller::for_shape(&TypeShape::Str.optional());
    coupon.bind(&BindContext::new("Cart", "coupon"))?;

    println!(
        "  {} accepted {:?}",
        coupon.origin(),
        coupon.fill(Value::Null).finish()?
    );

    Ok(())
}

/// Demonstrates filling a raw JSON record field by field.
fn demonstrate_json_record() -> Result<(), FillerError> {
    println!("\n=== Filling a JSON Record ===");

    let payload = json!({
        "title": "  So What  ",
        "number": "1",
        "duration": 9,
    });

    let ctx = BindContext::new("Track", "*");

    let mut title = ShapedFiller::for_shape(&TypeShape::Str)
        .with_validator(validators::trimmed())
        .with_validator(validators::non_empty());
    let mut number = ShapedFiller::for_shape(&TypeShape::Int)
        .with_coercer(coercers::parse_int())
        .with_validator(validators::int_range(1, 99));
    let mut duration = ShapedFiller::for_shape(&TypeShape::Float)
        .with_coercer(coercers::int_to_float())
        .with_validator(validators::finite());

    title.bind(&ctx)?;
    number.bind(&ctx)?;
    duration.bind(&ctx)?;

    let field = |name: &str| Value::from(payload[name].clone());

    let title: String = title.fill(field("title")).finish()?.try_into().unwrap();
    let number: i64 = number.fill(field("number")).finish()?.try_into().unwrap();
    let duration: f64 = duration.fill(field("duration")).finish()?.try_into().unwrap();

    println!("  title    = {title:?}");
    println!("  number   = {number}");
    println!("  duration = {duration}");

    Ok(())
}

fn main() -> Result<(), FillerError> {
    println!("===========================================");
    println!("  TypeFill Fillers - Basic Example");
    println!("===========================================");

    demonstrate_staged_filling()?;
    demonstrate_stepping()?;
    demonstrate_shape_derived_fillers()?;
    demonstrate_json_record()?;

    println!("\n===========================================");
    println!("  All demonstrations completed!");
    println!("===========================================");

    Ok(())
}
