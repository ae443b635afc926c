use std::path::Path;

use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::error::Result;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

enum Block {
    Content(Markup),
    Plot(Plot),
}

/// A titled part of a report, i.e. one figure with its caption.
pub struct ReportSection {
    title: String,
    blocks: Vec<Block>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn add_content(&mut self, content: Markup) {
        self.blocks.push(Block::Content(content));
    }

    pub fn add_plot(&mut self, plot: Plot) {
        self.blocks.push(Block::Plot(plot));
    }

    pub fn n_plots(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Plot(_)))
            .count()
    }

    fn render(&self, index: usize) -> Markup {
        html! {
            section class="report-section" {
                h2 { (self.title) }
                @for (i, block) in self.blocks.iter().enumerate() {
                    @match block {
                        Block::Content(markup) => {
                            div class="content" { (markup) }
                        }
                        Block::Plot(plot) => {
                            div class="plot" {
                                (PreEscaped(plot.to_inline_html(Some(format!("plot-{}-{}", index, i).as_str()))))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Single-page HTML report made of [`ReportSection`]s.
pub struct Report {
    software: String,
    version: String,
    title: String,
    created: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(software: &str, version: &str, title: &str) -> Self {
        Self {
            software: software.to_string(),
            version: version.to_string(),
            title: title.to_string(),
            created: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn render(&self) -> String {
        let page = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style {
                        "body { font-family: sans-serif; margin: 2em; }
                         .report-section { margin-bottom: 3em; }
                         footer { color: #777; font-size: 0.9em; }"
                    }
                }
                body {
                    h1 { (self.title) }
                    @for (i, section) in self.sections.iter().enumerate() {
                        (section.render(i))
                    }
                    footer {
                        "Generated by " (self.software) " " (self.version) " on " (self.created)
                    }
                }
            }
        };
        page.into_string()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(&path, self.render())?;
        log::info!("Report saved to {}", path.as_ref().display());
        Ok(())
    }
}
