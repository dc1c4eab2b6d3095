//! # Galley CLI
//!
//! Resolves a template's pixel layout without a browser — handy for
//! checking a template before shipping it to the editor.
//!
//! Usage:
//!   galley template.json
//!   echo '{ ... }' | galley
//!   galley template.json --shapes dist/asset/template
//!   galley --example > template.json

use std::env;
use std::fs;
use std::io::{self, Read};

use futures::executor::block_on;
use galley::fetch::FileSource;
use galley::{Editor, TemplateSpec, Viewport};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_template_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .expect("Failed to read stdin");
        buf
    };

    let shape_base = args
        .windows(2)
        .find(|w| w[0] == "--shapes")
        .map(|w| w[1].clone());

    let mut editor = Editor::new(Viewport::new(1280.0, 800.0));
    if let Some(base) = shape_base {
        editor = editor.with_vector_source(FileSource::new(base));
    }

    let template = match TemplateSpec::from_json(&input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    match block_on(editor.render(template)) {
        Ok(()) => {
            let scene = editor.scene().expect("scene after render");
            println!(
                "page size: {:.1} × {:.1} px  (scale {:.4})",
                scene.measure.px_width, scene.measure.px_height, scene.scale
            );
            for page in &scene.pages {
                println!(
                    "page {}: {} element(s){}",
                    page.index + 1,
                    page.nodes.len(),
                    if page.active { "  [active]" } else { "" }
                );
            }
            println!("{}", editor.page_label());
            println!("{}", editor.zoom_label());
        }
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}

fn example_template_json() -> &'static str {
    r##"{
  "props": { "title": "Sample template 85x55mm — 2 sides" },
  "measure": {
    "unit": "mm",
    "dpi": 300,
    "width": 85,
    "height": 55,
    "bleed": 5,
    "cut": 3
  },
  "pages": [
    {
      "background": { "color": "#dddddd" },
      "elements": [
        {
          "type": "text",
          "x": 15, "y": 10,
          "text": "Sample text",
          "size": 21,
          "color": "#ffffff",
          "font": "Oi"
        },
        {
          "type": "vector",
          "x": 6, "y": 6, "width": 73, "height": 12,
          "src": "shape/aggressive-streak-sm.svg",
          "fillColor": "#4b4c48ff"
        },
        {
          "type": "image",
          "x": 30, "y": 40, "width": 25, "height": 13,
          "src": "image/sample-1.png"
        }
      ]
    },
    {
      "background": { "color": "#ea7c7c", "image": "background/mm/85x55/sample-2.jpg" },
      "elements": [
        {
          "type": "text",
          "x": 6, "y": 6,
          "text": "Sample text",
          "size": 21,
          "color": "#ffffff",
          "bold": true,
          "italic": true
        },
        {
          "type": "image",
          "x": 30, "y": 22, "width": 32, "height": 28,
          "src": "image/sample-2.png",
          "locked": true
        }
      ]
    }
  ]
}
"##
}
