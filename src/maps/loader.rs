//! Background map loading
//!
//! Files are read and decoded on a worker thread (native) so the frame loop
//! never stalls; results are polled once per frame and tagged with the
//! engine's load token.

use std::sync::mpsc::{channel, Receiver, Sender};
use crate::engine::LoadToken;
use crate::rasterizer::{Texture, TextureError};
use super::catalog::{tiles_texture, MapEntry, MapSource};

/// A finished load, successful or not
pub struct LoadResult {
    pub token: LoadToken,
    pub name: String,
    pub texture: Result<Texture, TextureError>,
}

pub struct MapLoader {
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl MapLoader {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// Start loading `entry`; the result arrives through [`MapLoader::poll`]
    pub fn load(&self, token: LoadToken, entry: &MapEntry) {
        let tx = self.tx.clone();
        let name = entry.name.clone();
        log::info!("Loading map {}", name);

        match &entry.source {
            MapSource::Tiles => {
                let _ = tx.send(LoadResult {
                    token,
                    name,
                    texture: Ok(tiles_texture()),
                });
            }
            MapSource::File(path) => {
                let path = path.clone();
                let job = move || {
                    let texture = Texture::from_file(&path);
                    // Receiver gone means the app is shutting down
                    let _ = tx.send(LoadResult { token, name, texture });
                };

                #[cfg(not(target_arch = "wasm32"))]
                {
                    std::thread::spawn(job);
                }

                #[cfg(target_arch = "wasm32")]
                {
                    job();
                }
            }
        }
    }

    /// Drain all loads that finished since the last call
    pub fn poll(&self) -> Vec<LoadResult> {
        self.rx.try_iter().collect()
    }
}

impl Default for MapLoader {
    fn default() -> Self {
        Self::new()
    }
}
