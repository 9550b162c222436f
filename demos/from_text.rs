use rectcloud::{tokenize, ColorScheme, WordCloudBuilder};
use std::fs;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(text_path), Some(font_path)) = (args.next(), args.next()) else {
        eprintln!("usage: from_text <words.txt> <font.ttf> [output.png]");
        std::process::exit(2);
    };
    let output = args.next().unwrap_or_else(|| "output_cloud.png".to_string());

    let start = Instant::now();
    let words = tokenize(&fs::read_to_string(&text_path)?);
    println!("Laying out {} words from {}...", words.len(), text_path);

    let cloud = WordCloudBuilder::new()
        .size(800, 600)
        .background_hex("#1a1a1a")
        .color_scheme(ColorScheme::Sunset)
        .font(fs::read(&font_path)?)
        .font_size_range(8.0, 160.0)
        .word_padding(1)
        .seed("demo")
        .build(&words)?;

    fs::write(&output, cloud.to_png()?)?;

    let summary = cloud.summary();
    println!(
        "Placed {} words ({} skipped) into {}",
        summary.placements.len(),
        summary.skipped,
        output
    );
    println!("Time elapsed: {:?}", start.elapsed());
    Ok(())
}
