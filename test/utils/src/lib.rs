/// A multi-paragraph assistant reply used by rendering and export tests.
pub fn long_reply_fixture() -> &'static str {
    return r#"
Here's a short overview of how tides work.

The moon's gravity pulls on the oceans, creating a bulge of water on the side of the Earth facing the moon and another bulge on the opposite side. As the Earth rotates, coastlines pass through both bulges, which is why most places see two high tides a day.

The sun also has an effect, although it is a little less than half as strong as the moon's.
"#
    .trim();
}

/// A response body from a hosted text-generation endpoint.
pub fn generation_body_fixture(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");

    return format!(r#"[{{"generated_text":"{escaped}"}}]"#);
}
