//! Integration tests for the retina model contract used by the demo driver.

use convis::config::RetinaConfig;
use convis::report::{plot_5d_matshow, plot_5d_time, plot_traces};
use convis::stimuli;
use convis::tensor::{every_nth_frame, mean_over_axes, mean_over_time_axis, to_5d};
use convis::{ConvisError, Retina, VisionModel};
use ndarray::{s, Array3};

/// A retina whose On and Off populations separate clearly on luminance steps.
fn responsive_retina() -> Retina {
    let mut config = RetinaConfig::default();
    config.opl.surround_weight = 0.0;
    config.ganglion_input.amplification = 1000.0;
    Retina::with_config(config).unwrap()
}

fn noisy_config() -> RetinaConfig {
    let mut config = RetinaConfig::default();
    config.spikes.noise_sigma = 0.5;
    config.spikes.refractory_stdev = 0.001;
    config
}

// ---------------------------------------------------------------------------
// Construction and representation
// ---------------------------------------------------------------------------

#[test]
fn constructs_without_arguments_and_prints() {
    let retina = Retina::new();
    let text = format!("{}", retina);
    assert!(!text.is_empty());
    assert!(text.starts_with("Retina("));
}

// ---------------------------------------------------------------------------
// Direct call and stepped run
// ---------------------------------------------------------------------------

#[test]
fn direct_call_returns_two_populations() {
    let mut retina = Retina::new();
    let output = retina.forward(stimuli::ones(100, 20, 20).view()).unwrap();
    assert!(output.len() >= 2);
    assert_eq!(output[0].shape(), &[1, 1, 100, 20, 20]);
    assert_eq!(output[1].shape(), &[1, 1, 100, 20, 20]);
    // windowed slicing along the time axis
    let every_50th = output[0].slice(s![.., .., ..;50, .., ..]);
    assert_eq!(every_50th.shape(), &[1, 1, 2, 20, 20]);
}

#[test]
fn stepped_run_returns_two_populations_aligned_with_input() {
    let mut retina = Retina::new();
    let output = retina.run(stimuli::ones(2000, 20, 20).view(), 100).unwrap();
    assert!(output.len() >= 2);
    for population in output.iter() {
        assert_eq!(population.shape(), &[1, 1, 2000, 20, 20]);
        assert!(population.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    let on = mean_over_time_axis(output[0].view()).unwrap();
    let off = mean_over_axes(output[1].view().into_dyn(), &[0, 1, 3, 4]).unwrap();
    assert_eq!(on.len(), 2000);
    assert_eq!(off.shape(), &[2000]);
    assert!(on.sum() > 0.0);
}

#[test]
fn run_with_uneven_chunks_keeps_every_frame() {
    let mut retina = Retina::new();
    let output = retina.run(stimuli::ones(250, 5, 5).view(), 100).unwrap();
    assert_eq!(output.n_frames(), 250);
}

#[test]
fn run_rejects_zero_time_step() {
    let mut retina = Retina::new();
    let res = retina.run(stimuli::ones(10, 4, 4).view(), 0);
    assert!(matches!(res, Err(ConvisError::InvalidParameter(_))));
}

#[test]
fn rejects_empty_and_non_finite_input() {
    let mut retina = Retina::new();
    assert!(matches!(
        retina.forward(Array3::<f32>::zeros((0, 4, 4)).view()),
        Err(ConvisError::EmptyInput)
    ));
    let mut bad = stimuli::ones(3, 2, 2);
    bad[[1, 0, 0]] = f32::NAN;
    assert!(matches!(
        retina.forward(bad.view()),
        Err(ConvisError::InvalidInput(1))
    ));
}

#[test]
fn accepts_extended_5d_input() {
    let mut retina = Retina::new();
    let input = to_5d(stimuli::ones(20, 6, 6));
    let output = retina.forward_5d(input.view()).unwrap();
    assert_eq!(output[0].shape(), &[1, 1, 20, 6, 6]);

    let batch_of_two = ndarray::Array5::<f32>::ones((2, 1, 20, 6, 6));
    assert!(matches!(
        retina.forward_5d(batch_of_two.view()),
        Err(ConvisError::ShapeMismatch(_, _))
    ));
}

// ---------------------------------------------------------------------------
// State handling
// ---------------------------------------------------------------------------

#[test]
fn chunked_run_equals_single_forward() {
    let stimulus = stimuli::flashing_square(120, 6, 6, 3, 40).unwrap();
    let expected = Retina::with_config(noisy_config())
        .unwrap()
        .forward(stimulus.view())
        .unwrap();
    for dt in [1, 7, 50, 500] {
        let mut retina = Retina::with_config(noisy_config()).unwrap();
        let output = retina.run(stimulus.view(), dt).unwrap();
        assert_eq!(output, expected, "dt = {}", dt);
    }
}

#[test]
fn step_larger_than_input_is_a_single_chunk() {
    let stimulus = stimuli::ones(10, 3, 3);
    let expected = Retina::new().forward(stimulus.view()).unwrap();
    let output = Retina::new().run(stimulus.view(), usize::MAX).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn reset_reproduces_first_call() {
    let stimulus = stimuli::moving_bar(80, 5, 8, 2, 0.1).unwrap();
    let mut retina = Retina::with_config(noisy_config()).unwrap();
    let first = retina.forward(stimulus.view()).unwrap();
    let second = retina.forward(stimulus.view()).unwrap();
    retina.reset();
    let again = retina.forward(stimulus.view()).unwrap();
    assert_eq!(first, again);
    assert_ne!(first, second);
}

#[test]
fn seed_changes_spike_trains() {
    let stimulus = stimuli::ones(100, 4, 4);
    let a = Retina::new().forward(stimulus.view()).unwrap();
    let mut config = RetinaConfig::default();
    config.seed = 7;
    let b = Retina::with_config(config)
        .unwrap()
        .forward(stimulus.view())
        .unwrap();
    assert_ne!(a, b);
}

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

#[test]
fn on_cells_prefer_light_onset_and_off_cells_prefer_offset() {
    let mut stimulus = Array3::<f32>::zeros((500, 8, 8));
    stimulus.slice_mut(s![..300, .., ..]).fill(1.0);

    let mut retina = responsive_retina();
    let output = retina.forward(stimulus.view()).unwrap();

    let count = |population: usize, from: usize, to: usize| -> f32 {
        output[population].slice(s![.., .., from..to, .., ..]).sum()
    };
    // light onset
    assert!(count(0, 0, 150) > count(1, 0, 150));
    // light offset
    assert!(count(1, 300, 400) > count(0, 300, 400));
}

// ---------------------------------------------------------------------------
// Display helpers on model output
// ---------------------------------------------------------------------------

#[test]
fn plots_accept_model_output() {
    let mut retina = Retina::new();
    let output = retina.run(stimuli::ones(200, 8, 8).view(), 50).unwrap();

    assert!(plot_5d_time(output[0].view().into_dyn(), "On Cells (1 line = 1 pixel)").is_ok());
    let frames = every_nth_frame(output[0].view(), 50).unwrap();
    assert!(plot_5d_matshow(frames, "Every 50th frame of activity").is_ok());

    let on = mean_over_time_axis(output[0].view()).unwrap();
    let off = mean_over_time_axis(output[1].view()).unwrap();
    assert!(plot_5d_time(on.view().into_dyn(), "Mean On").is_ok());
    assert!(plot_traces(
        &[("On", on.view()), ("Off", off.view())],
        "Mean Activity of On and Off Cells",
        retina.config().frame_duration,
    )
    .is_ok());
}
