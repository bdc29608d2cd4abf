use stepwise_attrs::ErrorKind;
use stepwise_error::Error;

#[derive(Debug, ErrorKind)]
#[error(
    message = "cannot divide by zero",
    labels = ["this denominator", ""],
    help = "try a non-zero denominator",
)]
struct DivideByZero;

#[derive(Debug, ErrorKind)]
#[error(
    message = format!("unknown function `{}`", name),
    labels = [format!("`{}` is not defined", name)],
)]
struct UnknownFunction {
    name: String,
}

/// Renders the error to a plain string without color codes.
fn render(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    error.write_report("input", source, &mut buf).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
}

#[test]
fn unit_kind_report() {
    let error = Error::new(vec![4..5, 0..1], DivideByZero);
    let report = render(&error, "1 / 0");

    assert!(report.contains("cannot divide by zero"));
    assert!(report.contains("this denominator"));
    assert!(report.contains("try a non-zero denominator"));
}

#[test]
fn named_fields_in_scope() {
    let error = Error::new(vec![0..3], UnknownFunction { name: "foo".to_string() });
    let report = render(&error, "foo(2)");

    assert!(report.contains("unknown function `foo`"));
    assert!(report.contains("`foo` is not defined"));
}
