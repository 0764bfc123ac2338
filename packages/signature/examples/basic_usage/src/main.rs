#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Walks through a signature capture session with `pmu_signature`.
//!
//! This example shows how to:
//! - Feed pointer events into a `SignaturePad`
//! - Undo and clear strokes
//! - Confirm with and without a previously stored signature

use std::error::Error;

use pmu_signature::{
    CanvasSize, Point, PointerEvent, SignatureArtifact, SignaturePad, SignatureSubmitter,
    SoftwareRasterizer, async_trait,
};

/// Stands in for the upload service: saves new images next to the binary.
struct SaveToDisk;

#[async_trait]
impl SignatureSubmitter for SaveToDisk {
    type Output = String;
    type Error = std::io::Error;

    async fn submit(&self, artifact: SignatureArtifact) -> Result<String, std::io::Error> {
        match artifact {
            SignatureArtifact::Image(image) => {
                let path = format!("signature.{}", image.encoding.extension());
                std::fs::write(&path, &image.bytes)?;
                Ok(path)
            }
            SignatureArtifact::Baseline(uri) => Ok(uri),
        }
    }
}

fn draw(pad: &mut SignaturePad, points: &[(f32, f32)]) {
    let mut points = points.iter().copied().map(Point::from);
    if let Some(first) = points.next() {
        pad.handle_event(PointerEvent::Down(first));
    }
    for point in points {
        pad.handle_event(PointerEvent::Move(point));
    }
    pad.handle_event(PointerEvent::Up);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("PMU Signature Basic Usage Example");
    println!("=================================\n");

    let rasterizer = SoftwareRasterizer::default();

    println!("Step 1: Confirming an empty pad...");
    let mut pad = SignaturePad::new(CanvasSize::new(300, 150))?;
    match pad.confirm(&rasterizer, &SaveToDisk).await {
        Ok(_) => println!("Unexpectedly accepted an empty signature\n"),
        Err(e) => println!("Rejected: {e}\n"),
    }

    println!("Step 2: Drawing two strokes and undoing one...");
    draw(&mut pad, &[(20.0, 100.0), (60.0, 40.0), (100.0, 100.0)]);
    draw(&mut pad, &[(120.0, 100.0), (160.0, 30.0)]);
    pad.undo();
    println!("Strokes left: {}", pad.drawing().stroke_count());
    for path in pad.drawing().svg_path_data() {
        println!("  path: {path}");
    }
    println!();

    println!("Step 3: Confirming the drawing...");
    let saved = pad.confirm(&rasterizer, &SaveToDisk).await?;
    println!("Saved new signature to: {saved}\n");

    println!("Step 4: Reusing an existing signature...");
    let mut pad = SignaturePad::new(CanvasSize::new(300, 150))?
        .with_baseline("https://storage.example.com/signatures/profile.png");
    let reused = pad.confirm(&rasterizer, &SaveToDisk).await?;
    println!("Kept existing signature: {reused}");

    Ok(())
}
