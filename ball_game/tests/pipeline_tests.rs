use ball_game::core_modules::ball::Ball;
use ball_game::core_modules::frame::Frame;
use ball_game::presenter::{self, LogPresenter, sync_toggle};
use ball_game::{
    BallGamePipeline, CameraSession, CaptureDevice, Controls, GameConfig, PipelineConfig, RenderSender,
    SyntheticCamera, TickOutcome, ToggleState,
};
use image::Rgb;
use std::time::Duration;
use tokio::sync::watch;

fn red_controls() -> Controls {
    Controls {
        hue: (0, 10),
        saturation: (100, 255),
        value: (50, 255),
        ball_speed: 5,
    }
}

fn red_square_frame(mirror_width: u32) -> Frame {
    let mut frame = Frame::from_pixel(mirror_width, 480, Rgb([30, 30, 30]));
    for y in 100..150 {
        for x in 100..150 {
            frame.put_pixel(x, y, Rgb([220, 20, 20]));
        }
    }
    frame
}

#[test]
fn red_square_is_tracked_and_bounces_the_ball() {
    let mut pipeline = BallGamePipeline::new(PipelineConfig {
        mirror: false,
        ..PipelineConfig::default()
    });

    let outcome = pipeline.process_tick(red_square_frame(640), &red_controls());
    let TickOutcome::Rendered(output) = outcome else {
        panic!("expected a rendered tick");
    };

    // Blur fringe plus the erode/dilate kernels grow the square by roughly a dozen pixels.
    assert_eq!(output.detections.len(), 1);
    let rect = output.detections[0].rect;
    assert!((80..=99).contains(&rect.x), "rect {rect:?}");
    assert!((80..=99).contains(&rect.y), "rect {rect:?}");
    assert!((151..=175).contains(&(rect.x + rect.width)), "rect {rect:?}");
    assert!((151..=175).contains(&(rect.y + rect.height)), "rect {rect:?}");

    let center = output.detections[0].center;
    assert!((118..=135).contains(&center.x), "center {center:?}");
    assert_eq!(output.labels.len(), 1);
    assert_eq!(
        output.labels[0].text,
        format!("Tracking object at ({},{})", center.x, center.y)
    );

    // The ball started at (100,100), inside the object.
    assert!(output.bounced);
    assert_eq!(pipeline.ball().position(), (95, 95));
}

#[test]
fn mirrored_frames_track_on_the_opposite_side() {
    let mut pipeline = BallGamePipeline::new(PipelineConfig::default());

    let outcome = pipeline.process_tick(red_square_frame(640), &red_controls());
    let TickOutcome::Rendered(output) = outcome else {
        panic!("expected a rendered tick");
    };

    assert_eq!(output.detections.len(), 1);
    assert!(output.detections[0].center.x > 480);
    assert!(!output.bounced);
    assert_eq!(pipeline.ball().position(), (105, 105));
}

#[test]
fn ball_far_from_the_object_keeps_moving() {
    let mut pipeline = BallGamePipeline::new(PipelineConfig {
        mirror: false,
        ..PipelineConfig::default()
    });
    let mut ball = Ball::new(640, 480);
    ball.x = 400;
    ball.y = 300;
    pipeline.set_ball(ball);

    let outcome = pipeline.process_tick(red_square_frame(640), &red_controls());
    let TickOutcome::Rendered(output) = outcome else {
        panic!("expected a rendered tick");
    };

    assert_eq!(output.detections.len(), 1);
    assert!(!output.bounced);
    assert_eq!(pipeline.ball().position(), (405, 305));
}

#[test]
fn empty_frames_leave_the_game_untouched() {
    let mut pipeline = BallGamePipeline::new(PipelineConfig::default());
    let before = *pipeline.ball();

    for _ in 0..3 {
        assert!(matches!(
            pipeline.process_tick(Frame::new(0, 0), &red_controls()),
            TickOutcome::Skipped
        ));
    }
    assert_eq!(*pipeline.ball(), before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn synthetic_camera_game_round_trip() {
    let config = GameConfig {
        tick_period: Duration::from_millis(5),
        shutdown_grace: Duration::from_millis(200),
        render_queue_depth: 64,
        ..GameConfig::default()
    };
    let camera = SyntheticCamera::new(640, 480).with_empty_every(4);
    let (_controls_tx, controls_rx) = watch::channel(red_controls());
    let (render, mut render_rx) = RenderSender::channel(config.render_queue_depth);
    let mut session = CameraSession::new(config, camera, controls_rx, render);
    let mut log = LogPresenter::default();

    let state = session.toggle().await.unwrap();
    assert_eq!(state, ToggleState::Active);
    sync_toggle(&mut log, &mut render_rx, state);
    assert_eq!(log.toggle_label, "Stop Camera");

    let first = tokio::time::timeout(Duration::from_secs(5), render_rx.recv())
        .await
        .expect("a tick within the timeout")
        .expect("channel open");
    assert_eq!(first.output.detections.len(), 1);
    first.apply(&mut log);

    tokio::time::sleep(Duration::from_millis(50)).await;
    presenter::drain(&mut render_rx, &mut log);

    let state = session.toggle().await.unwrap();
    sync_toggle(&mut log, &mut render_rx, state);

    assert_eq!(log.toggle_label, "Start Camera");
    assert!(log.frames_shown >= 1);
    assert_eq!(
        log.last_range_text,
        "Hue range: 0-10. Sat. range: 100-255. Value range: 50-255"
    );
    assert!(!session.device().lock().unwrap().is_opened());
    assert!(render_rx.try_recv().is_err());
}
