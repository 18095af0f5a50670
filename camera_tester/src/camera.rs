// OpenCV webcam behind the `CaptureDevice` seam. OpenCV hands out BGR Mats;
// the game works on RGB image buffers, so every read converts and copies.

use ball_game::core_modules::frame::Frame;
use ball_game::{CaptureDevice, GameError, Result};
use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};

fn capture_err(e: opencv::Error) -> GameError {
    GameError::Capture(e.to_string())
}

#[derive(Default)]
pub struct OpenCvCamera {
    cap: Option<VideoCapture>,
}

impl CaptureDevice for OpenCvCamera {
    fn open(&mut self, index: i32) -> Result<bool> {
        let cap = VideoCapture::new(index, videoio::CAP_ANY).map_err(capture_err)?;
        let opened = cap.is_opened().map_err(capture_err)?;
        self.cap = Some(cap);
        Ok(opened)
    }

    fn is_opened(&self) -> bool {
        self.cap
            .as_ref()
            .is_some_and(|cap| cap.is_opened().unwrap_or(false))
    }

    fn read(&mut self) -> Result<Frame> {
        let Some(cap) = self.cap.as_mut() else {
            return Ok(Frame::new(0, 0));
        };

        let mut bgr = Mat::default();
        if !cap.read(&mut bgr).map_err(capture_err)? || bgr.empty() {
            return Ok(Frame::new(0, 0));
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0).map_err(capture_err)?;
        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let bytes = rgb.data_bytes().map_err(capture_err)?.to_vec();
        Frame::from_raw(width, height, bytes)
            .ok_or_else(|| GameError::Capture(format!("short {width}x{height} frame buffer")))
    }

    fn release(&mut self) -> Result<()> {
        if let Some(mut cap) = self.cap.take() {
            cap.release().map_err(capture_err)?;
        }
        Ok(())
    }
}
