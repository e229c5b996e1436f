//! Basic builder example - assembling a small page in one chain

use markup::Builder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut page = Builder::new();
    page.set_tag("section").class("hero");

    page.open_as("title")?
        .set_tag("h1")
        .class("hero-title")
        .add_content("Fluent markup");
    page.close()?;

    page.open_as("body")?
        .class("hero-body")
        .add_content("Chained calls, one tree, explicit serialization.");
    page.close()?;

    // Revisit the body by alias and drop an image into it.
    page.nest("body")?;
    page.open()
        .set_tag("img")
        .set_attr("src", "/img/hero.png")
        .set_attr("alt", "hero");
    page.close()?;
    page.close()?;

    println!("{}", page.render()?);

    Ok(())
}
