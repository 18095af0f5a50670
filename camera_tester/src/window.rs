// HighGUI windows for the game: the annotated frame, two small mask previews,
// a status strip for the range text and toggle label, and a controls window
// whose trackbars are the sliders.
//
// `Presenter` calls cannot fail, so OpenCV errors are logged and the update skipped.

use ball_game::controls::{Controls, SLIDERS};
use ball_game::core_modules::frame::{Frame, Mask};
use ball_game::pipeline::Label;
use ball_game::Presenter;
use opencv::{
    core::{self, Mat, Point, Scalar, Size},
    highgui, imgproc,
    prelude::*,
};
use tracing::warn;

pub const FRAME_WINDOW: &str = "Ball game";
pub const MASK_WINDOW: &str = "Mask";
pub const CLEANED_WINDOW: &str = "Cleaned mask";
pub const STATUS_WINDOW: &str = "Status";
pub const CONTROLS_WINDOW: &str = "Controls";

const PREVIEW: Size = Size { width: 205, height: 154 };
const STATUS_SIZE: (i32, i32) = (640, 64);

fn bgr(color: image::Rgb<u8>) -> Scalar {
    let [r, g, b] = color.0;
    Scalar::new(b as f64, g as f64, r as f64, 0.0)
}

fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mut rgb = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        core::CV_8UC3,
        Scalar::all(0.0),
    )?;
    rgb.data_bytes_mut()?.copy_from_slice(frame.as_raw());
    let mut out = Mat::default();
    imgproc::cvt_color(&rgb, &mut out, imgproc::COLOR_RGB2BGR, 0)?;
    Ok(out)
}

fn mask_to_preview(mask: &Mask) -> opencv::Result<Mat> {
    let mut gray = Mat::new_rows_cols_with_default(
        mask.height() as i32,
        mask.width() as i32,
        core::CV_8UC1,
        Scalar::all(0.0),
    )?;
    gray.data_bytes_mut()?.copy_from_slice(mask.as_raw());
    let mut small = Mat::default();
    imgproc::resize(&gray, &mut small, PREVIEW, 0.0, 0.0, imgproc::INTER_LINEAR)?;
    Ok(small)
}

pub struct HighGuiPresenter {
    range_text: String,
    toggle_label: String,
}

impl HighGuiPresenter {
    /// Opens every window and puts the sliders at their defaults.
    pub fn open() -> opencv::Result<Self> {
        for name in [FRAME_WINDOW, MASK_WINDOW, CLEANED_WINDOW, STATUS_WINDOW, CONTROLS_WINDOW] {
            highgui::named_window(name, highgui::WINDOW_AUTOSIZE)?;
        }
        for spec in SLIDERS {
            highgui::create_trackbar(spec.name, CONTROLS_WINDOW, None, spec.max, None)?;
            highgui::set_trackbar_min(spec.name, CONTROLS_WINDOW, spec.min)?;
            highgui::set_trackbar_pos(spec.name, CONTROLS_WINDOW, spec.default)?;
        }
        let mut presenter = Self {
            range_text: String::new(),
            toggle_label: String::new(),
        };
        presenter.clear();
        Ok(presenter)
    }

    /// Current trackbar positions, starting from `current` for anything unreadable.
    pub fn read_controls(&self, current: Controls) -> Controls {
        let mut controls = current;
        for spec in SLIDERS {
            match highgui::get_trackbar_pos(spec.name, CONTROLS_WINDOW) {
                Ok(pos) => {
                    controls.set(spec.name, pos);
                }
                Err(e) => warn!(slider = spec.name, error = %e, "trackbar unreadable"),
            }
        }
        controls
    }

    fn draw_status(&self) -> opencv::Result<()> {
        let mut strip = Mat::new_rows_cols_with_default(
            STATUS_SIZE.1,
            STATUS_SIZE.0,
            core::CV_8UC3,
            Scalar::all(240.0),
        )?;
        let black = Scalar::all(0.0);
        for (text, y) in [(&self.range_text, 24), (&self.toggle_label, 52)] {
            imgproc::put_text(
                &mut strip,
                text,
                Point::new(10, y),
                imgproc::FONT_HERSHEY_PLAIN,
                1.2,
                black,
                1,
                imgproc::LINE_8,
                false,
            )?;
        }
        highgui::imshow(STATUS_WINDOW, &strip)
    }

    fn try_show_frame(&mut self, frame: &Frame, labels: &[Label]) -> opencv::Result<()> {
        let mut mat = frame_to_mat(frame)?;
        for label in labels {
            imgproc::put_text(
                &mut mat,
                &label.text,
                Point::new(label.origin.x, label.origin.y),
                imgproc::FONT_HERSHEY_PLAIN,
                1.0,
                bgr(label.color),
                2,
                imgproc::LINE_8,
                false,
            )?;
        }
        highgui::imshow(FRAME_WINDOW, &mat)
    }

    fn try_clear(&mut self) -> opencv::Result<()> {
        let blank = Mat::new_rows_cols_with_default(480, 640, core::CV_8UC3, Scalar::all(0.0))?;
        highgui::imshow(FRAME_WINDOW, &blank)?;
        let small = Mat::new_size_with_default(PREVIEW, core::CV_8UC1, Scalar::all(0.0))?;
        highgui::imshow(MASK_WINDOW, &small)?;
        highgui::imshow(CLEANED_WINDOW, &small)
    }
}

fn log_failure(surface: &str, result: opencv::Result<()>) {
    if let Err(e) = result {
        warn!(surface, error = %e, "window update failed");
    }
}

impl Presenter for HighGuiPresenter {
    fn show_frame(&mut self, frame: &Frame, labels: &[Label]) {
        let result = self.try_show_frame(frame, labels);
        log_failure(FRAME_WINDOW, result);
    }

    fn show_mask(&mut self, mask: &Mask) {
        log_failure(
            MASK_WINDOW,
            mask_to_preview(mask).and_then(|m| highgui::imshow(MASK_WINDOW, &m)),
        );
    }

    fn show_cleaned(&mut self, mask: &Mask) {
        log_failure(
            CLEANED_WINDOW,
            mask_to_preview(mask).and_then(|m| highgui::imshow(CLEANED_WINDOW, &m)),
        );
    }

    fn set_range_text(&mut self, text: &str) {
        if self.range_text != text {
            self.range_text = text.to_string();
            log_failure(STATUS_WINDOW, self.draw_status());
        }
    }

    fn set_toggle_label(&mut self, label: &str) {
        self.toggle_label = label.to_string();
        log_failure(STATUS_WINDOW, self.draw_status());
    }

    fn clear(&mut self) {
        let result = self.try_clear();
        log_failure(FRAME_WINDOW, result);
    }
}
