//! Engine injection into every frame of a page
//!
//! Frames are walked depth-first. Before entering a child frame the session is
//! reset to the top-level document and walked down the full ancestor chain,
//! since some sessions lose their frame depth when asked to skip levels.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use axescan_common::Result;

use crate::driver::{By, ElementHandle, WebDriver};

/// Tag of the frame elements the walk descends into
pub const FRAME_TAG: &str = "iframe";

pub struct FrameInjector<'a> {
    driver: &'a dyn WebDriver,
}

impl<'a> FrameInjector<'a> {
    pub fn new(driver: &'a dyn WebDriver) -> Self {
        Self { driver }
    }

    /// Inject `script` into every nested frame (when `apply_to_frames`) and then
    /// exactly once into the top-level document.
    ///
    /// Transport failures propagate unchanged; nothing is retried. Re-running on
    /// an already instrumented page is safe as long as the script is.
    pub async fn inject(&self, script: &str, apply_to_frames: bool) -> Result<()> {
        if apply_to_frames {
            self.inject_into_frames(script, Vec::new()).await?;
        }

        self.driver.switch_to_default_content().await?;
        self.driver.execute_script(script, Vec::new()).await?;
        debug!("Injected engine into top-level document");
        Ok(())
    }

    fn inject_into_frames<'s>(
        &'s self,
        script: &'s str,
        parents: Vec<ElementHandle>,
    ) -> BoxFuture<'s, Result<()>> {
        async move {
            let frames = self.driver.find_elements(&By::tag_name(FRAME_TAG)).await?;

            for frame in frames {
                self.driver.switch_to_default_content().await?;
                for parent in &parents {
                    self.driver.switch_to_frame(parent).await?;
                }

                self.driver.switch_to_frame(&frame).await?;
                self.driver.execute_script(script, Vec::new()).await?;
                debug!(depth = parents.len() + 1, frame = %frame.id, "Injected engine into frame");

                let mut chain = parents.clone();
                chain.push(frame);
                self.inject_into_frames(script, chain).await?;
            }

            Ok(())
        }
        .boxed()
    }
}
