use convis::report::{plot_5d_matshow, plot_5d_time, plot_traces, Report, ReportSection};
use convis::tensor::{every_nth_frame, mean_over_time_axis};
use convis::{Retina, VisionModel};
use maud::html;
use ndarray::Array3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut retina = Retina::new();
    println!("{}", retina);

    let inp = Array3::<f32>::ones((100, 20, 20));
    let output = retina.forward(inp.view())?;
    println!("Direct call: {} populations of shape {:?}", output.len(), output[0].shape());

    let inp = Array3::<f32>::ones((2000, 20, 20));
    let output = retina.run(inp.view(), 100)?;
    println!("Stepped run: {} populations of shape {:?}", output.len(), output[0].shape());

    let mut report = Report::new("convis", env!("CARGO_PKG_VERSION"), "Retina demo");

    let mut section = ReportSection::new("On Cells (1 line = 1 pixel)");
    section.add_plot(plot_5d_time(output[0].view().into_dyn(), "On Cells (1 line = 1 pixel)")?);
    report.add_section(section);

    let mut section = ReportSection::new("Every 50th frame of activity");
    let frames = every_nth_frame(output[0].view(), 50)?;
    section.add_plot(plot_5d_matshow(frames, "Every 50th frame of activity")?);
    report.add_section(section);

    // dimension 2 is time, so we average over all others
    let on = mean_over_time_axis(output[0].view())?;
    let off = mean_over_time_axis(output[1].view())?;
    let mut section = ReportSection::new("Mean Activity of On and Off Cells");
    section.add_content(html! { "Spikes per frame averaged over all pixels." });
    section.add_plot(plot_traces(
        &[("On", on.view()), ("Off", off.view())],
        "Mean Activity of On and Off Cells",
        retina.config().frame_duration,
    )?);
    report.add_section(section);

    report.save_to_file("retina_demo.html")?;
    println!("Report saved to retina_demo.html");
    Ok(())
}
