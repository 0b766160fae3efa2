use crate::player::TrackBackend;
use sevenfold_core::constants::DIAMOND_COUNT;
use sevenfold_core::{DiamondIndex, SceneError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, GainNode, Response, StereoPannerNode};

type LoadQueue = Rc<RefCell<VecDeque<(DiamondIndex, Result<AudioBuffer, String>)>>>;

/// One looping track: source -> gain -> stereo panner -> master.
struct Voice {
    source: AudioBufferSourceNode,
    gain: GainNode,
    panner: StereoPannerNode,
}

/// Wraps the Web Audio API: the AudioContext, master gain, decoded track
/// buffers, and the voices currently playing.
pub struct AudioBridge {
    ctx: AudioContext,
    master_gain: GainNode,
    finished: LoadQueue,
    buffers: [Option<AudioBuffer>; DIAMOND_COUNT],
    voices: [Option<Voice>; DIAMOND_COUNT],
}

impl AudioBridge {
    /// Create the context and master gain. The context starts suspended
    /// until `resume` runs inside a user gesture.
    pub fn new() -> Result<Self, SceneError> {
        let ctx = AudioContext::new().map_err(|e| SceneError::AudioInit(format!("{e:?}")))?;
        let master_gain = ctx
            .create_gain()
            .map_err(|e| SceneError::AudioInit(format!("{e:?}")))?;
        master_gain
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| SceneError::AudioInit(format!("{e:?}")))?;
        master_gain.gain().set_value(1.0);

        Ok(Self {
            ctx,
            master_gain,
            finished: Rc::new(RefCell::new(VecDeque::new())),
            buffers: Default::default(),
            voices: Default::default(),
        })
    }

    fn build_voice(&self, buffer: &AudioBuffer, gain: f32, pan: f32) -> Result<Voice, JsValue> {
        let source = self.ctx.create_buffer_source()?;
        source.set_buffer(Some(buffer));
        source.set_loop(true);

        let gain_node = self.ctx.create_gain()?;
        gain_node.gain().set_value(gain);

        let panner = self.ctx.create_stereo_panner()?;
        panner.pan().set_value(pan);

        source.connect_with_audio_node(&gain_node)?;
        gain_node.connect_with_audio_node(&panner)?;
        panner.connect_with_audio_node(&self.master_gain)?;
        source.start()?;

        Ok(Voice {
            source,
            gain: gain_node,
            panner,
        })
    }
}

async fn fetch_and_decode(ctx: AudioContext, url: String) -> Result<AudioBuffer, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(&url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    let bytes: js_sys::ArrayBuffer = JsFuture::from(response.array_buffer()?)
        .await?
        .dyn_into()?;
    let buffer: AudioBuffer = JsFuture::from(ctx.decode_audio_data(&bytes)?)
        .await?
        .dyn_into()?;
    Ok(buffer)
}

impl TrackBackend for AudioBridge {
    fn begin_load(&mut self, index: DiamondIndex, url: &str) {
        let ctx = self.ctx.clone();
        let finished = Rc::clone(&self.finished);
        let url = url.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_and_decode(ctx, url.clone())
                .await
                .map_err(|e| format!("{url}: {e:?}"));
            finished.borrow_mut().push_back((index, result));
        });
    }

    fn poll_loads(&mut self) -> Vec<(DiamondIndex, Result<(), SceneError>)> {
        let drained: Vec<_> = self.finished.borrow_mut().drain(..).collect();
        drained
            .into_iter()
            .map(|(index, result)| {
                let status = match result {
                    Ok(buffer) => {
                        self.buffers[index.get()] = Some(buffer);
                        Ok(())
                    }
                    Err(reason) => Err(SceneError::TrackLoad {
                        index: index.get(),
                        reason,
                    }),
                };
                (index, status)
            })
            .collect()
    }

    fn start(&mut self, index: DiamondIndex, gain: f32, pan: f32) -> Result<(), SceneError> {
        let buffer = self.buffers[index.get()]
            .as_ref()
            .ok_or_else(|| SceneError::AudioInit(format!("track {index} has no buffer")))?;
        let voice = self
            .build_voice(buffer, gain, pan)
            .map_err(|e| SceneError::AudioInit(format!("{e:?}")))?;
        self.voices[index.get()] = Some(voice);
        Ok(())
    }

    fn stop(&mut self, index: DiamondIndex) {
        if let Some(voice) = self.voices[index.get()].take() {
            let _ = voice.source.stop();
            let _ = voice.panner.disconnect();
        }
    }

    fn set_spatial(&mut self, index: DiamondIndex, gain: f32, pan: f32) {
        if let Some(voice) = &self.voices[index.get()] {
            voice.gain.gain().set_value(gain);
            voice.panner.pan().set_value(pan);
        }
    }

    fn resume(&mut self) {
        let _ = self.ctx.resume();
    }
}
