use rbr_core::Rect;

const LAYER_TOP: f32 = 30.0;

/// Far-to-near scroll factors of the three backdrop layers.
pub const BACKDROP_FACTORS: [f32; 3] = [0.075, 0.15, 0.3];

/// One horizontally tiled backdrop strip scrolling against the player's motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxLayer {
    pub factor: f32,
    pub scroll: f32,
    pub texture_width: f32,
    pub texture_height: f32,
}

impl ParallaxLayer {
    pub fn new(factor: f32, texture_width: f32, texture_height: f32) -> Self {
        Self {
            factor,
            scroll: 0.0,
            texture_width,
            texture_height,
        }
    }

    /// Scroll opposite to `x_velocity`. The offset stays in `(-texture_width, 0]`
    /// whichever way the player runs, carrying any overshoot across the wrap.
    pub fn advance(&mut self, x_velocity: f32, dt: f32) {
        self.scroll -= x_velocity * self.factor * dt;
        let width = self.texture_width;
        if width > 0.0 && (self.scroll > 0.0 || self.scroll <= -width) {
            let wrapped = self.scroll.rem_euclid(width);
            self.scroll = if wrapped > 0.0 { wrapped - width } else { 0.0 };
        }
    }

    /// Destination of the tiled strip: two texture widths starting at the scroll offset.
    pub fn dest(&self) -> Rect {
        Rect::new(
            self.scroll,
            LAYER_TOP,
            self.texture_width * 2.0,
            self.texture_height,
        )
    }
}

/// The three-layer scrolling background drawn behind the level.
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub layers: [ParallaxLayer; 3],
}

impl Backdrop {
    pub fn new(texture_width: f32, texture_height: f32) -> Self {
        Self {
            layers: BACKDROP_FACTORS
                .map(|factor| ParallaxLayer::new(factor, texture_width, texture_height)),
        }
    }

    pub fn advance(&mut self, x_velocity: f32, dt: f32) {
        for layer in &mut self.layers {
            layer.advance(x_velocity, dt);
        }
    }
}
