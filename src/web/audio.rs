//! Sound cues played through `<audio>` elements.

use log::debug;
use web_sys::HtmlAudioElement;

use crate::host::{AudioCues, Cue};

/// One preloaded `<audio>` element per cue, loaded from `{base}/{cue}.mp3`.
pub struct WebAudio {
    clips: Vec<(Cue, HtmlAudioElement)>,
}

impl WebAudio {
    pub fn load(base: &str) -> Self {
        let clips = Cue::ALL
            .iter()
            .filter_map(|&cue| {
                let src = format!("{base}/{}.mp3", cue.as_str());
                match HtmlAudioElement::new_with_src(&src) {
                    Ok(el) => Some((cue, el)),
                    Err(err) => {
                        debug!("no audio for {}: {err:?}", cue.as_str());
                        None
                    }
                }
            })
            .collect();
        Self { clips }
    }
}

impl AudioCues for WebAudio {
    fn play(&mut self, cue: Cue) {
        if let Some((_, el)) = self.clips.iter().find(|(c, _)| *c == cue) {
            el.set_current_time(0.0);
            // Autoplay policies may reject the promise; nothing to do about it.
            let _ = el.play();
        }
    }
}
