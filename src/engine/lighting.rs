use std::cell::Ref;

use crate::{
    Shared,
    color::Color,
    renderer::{Canvas, Composite, Surface, ensure_canvas},
    world::{Light, Obstacle, Occluder},
};

use super::LightingError;

/// Opacity each light sample contributes to the shadow layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ShadowAlpha {
    /// `1/n` rounded to whole percent.
    #[default]
    Quantized,
    /// `1/n`.
    Exact,
}

impl ShadowAlpha {
    /// Per-sample alpha for `samples` emission points.  Zero samples give a
    /// non-finite alpha, which paints nothing.
    pub fn per_sample(self, samples: usize) -> f64 {
        let n = samples as f64;
        match self {
            ShadowAlpha::Quantized => (100.0 / n).round() / 100.0,
            ShadowAlpha::Exact => 1.0 / n,
        }
    }
}

/// One light, its obstacles, and the cached lit image.
///
/// Every [`compute`](Self::compute) redraws from scratch: glow first, then
/// each light sample's shadows accumulated on a scratch layer, then the
/// scratch layer erased out of the glow.
pub struct Lighting {
    pub light: Shared<Light>,
    pub objects: Vec<Shared<Obstacle>>,
    pub shadow_alpha: ShadowAlpha,

    glow: Option<Canvas>,
    shadows: Option<Canvas>,
}

impl Lighting {
    pub fn new(light: Shared<Light>, objects: Vec<Shared<Obstacle>>) -> Self {
        Self {
            light,
            objects,
            shadow_alpha: ShadowAlpha::default(),
            glow: None,
            shadows: None,
        }
    }

    #[must_use]
    pub fn with_shadow_alpha(mut self, policy: ShadowAlpha) -> Self {
        self.shadow_alpha = policy;
        self
    }

    /// Redraw the lit image at `width × height`.
    pub fn compute(&mut self, width: usize, height: usize) -> Result<(), LightingError> {
        let mut light = self
            .light
            .try_borrow_mut()
            .map_err(|_| LightingError::Busy("light"))?;
        let glow = ensure_canvas(&mut self.glow, "lighting", width, height);
        glow.save();
        glow.clear();
        light.render(glow);
        drop(light);
        glow.set_composite(Composite::DestinationOut);

        let res = cast_into(
            &mut self.shadows,
            &self.light,
            &self.objects,
            self.shadow_alpha,
            glow,
        );
        glow.restore();
        res
    }

    /// Accumulate the shadows of every obstacle and composite them onto
    /// `output` with its current composite mode.
    pub fn cast(&mut self, output: &mut dyn Surface) -> Result<(), LightingError> {
        cast_into(
            &mut self.shadows,
            &self.light,
            &self.objects,
            self.shadow_alpha,
            output,
        )
    }

    /// Blit the last computed image; nothing before the first `compute`.
    pub fn render(&self, surface: &mut dyn Surface) {
        if let Some(glow) = &self.glow {
            surface.draw_image(glow.raster(), 0, 0);
        }
    }

    /// Last computed image.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.glow.as_ref()
    }

    /// Shadow layer of the last `compute` or `cast`.
    pub fn shadow_canvas(&self) -> Option<&Canvas> {
        self.shadows.as_ref()
    }
}

fn cast_into(
    scratch: &mut Option<Canvas>,
    light: &Shared<Light>,
    objects: &[Shared<Obstacle>],
    policy: ShadowAlpha,
    output: &mut dyn Surface,
) -> Result<(), LightingError> {
    let light = light.try_borrow().map_err(|_| LightingError::Busy("light"))?;
    let objects: Vec<Ref<'_, Obstacle>> = objects
        .iter()
        .map(|o| o.try_borrow())
        .collect::<Result<_, _>>()
        .map_err(|_| LightingError::Busy("obstacle"))?;

    let scratch = ensure_canvas(scratch, "shadow", output.width(), output.height());
    scratch.clear();

    let alpha = policy.per_sample(light.sample_count());
    scratch.set_fill(Color::BLACK.with_alpha(alpha).into());

    let bounds = light.bounds();
    let mut blocked = 0usize;
    for sample in light.samples() {
        if objects.iter().any(|o| o.contains(sample)) {
            blocked += 1;
            scratch.fill_rect(bounds.top_left, bounds.size());
            continue;
        }
        for o in &objects {
            o.cast(scratch, sample, &bounds)?;
        }
    }

    for o in &objects {
        let passing = o.diffuse * light.diffuse;
        scratch.set_fill(Color::BLACK.with_alpha(1.0 - passing).into());
        o.fill_body(scratch)?;
    }

    log::trace!(
        "shadows: {} samples ({} blocked) × {} obstacles, alpha {alpha}",
        light.sample_count(),
        blocked,
        objects.len()
    );

    output.draw_image(scratch.raster(), 0, 0);
    Ok(())
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
