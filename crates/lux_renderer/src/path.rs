//! Monte Carlo path tracing.

use lux_math::{max_channel, Color, Ray};
use rand::RngCore;

use crate::brdf::Brdf;
use crate::intersector::RayIntersector;
use crate::lighting::sample_direct_lighting;
use crate::renderer::RenderSettings;
use crate::sampling::{face_forward, gen_f32};
use crate::SURFACE_EPSILON;

/// Russian roulette only kicks in after this many bounces
const RUSSIAN_ROULETTE_START: u32 = 2;

/// Paths whose throughput falls below this are dropped
const MIN_THROUGHPUT: f32 = 1e-3;

/// BRDF samples with a pdf below this end the path
const MIN_PDF: f32 = 1e-6;

/// Radiance of the constant sky seen by escaping paths, the same in every
/// direction.
pub fn sample_environment_light(settings: &RenderSettings) -> Color {
    settings.sky_color * settings.sky_intensity
}

/// Trace one camera path and return its radiance estimate.
///
/// At every hit the direct light from one randomly chosen light is added
/// (when next-event estimation is enabled), then the BRDF picks the next
/// direction. Escaping paths pick up the sky. Paths end after
/// `max_bounces` bounces, on a vanishing pdf or throughput, or by Russian
/// roulette.
pub fn path_trace(
    intersector: &RayIntersector,
    ray: Ray,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = ray;

    for bounce in 0..=settings.max_bounces {
        let Some(hit) = intersector.intersect_ray(&ray) else {
            radiance += throughput * sample_environment_light(settings);
            break;
        };

        let wo = -ray.direction().normalize();
        let normal = face_forward(hit.normal, wo);
        let brdf = Brdf::from(&hit);

        if settings.enable_direct_lighting && settings.enable_next_event_estimation {
            radiance += throughput * sample_direct_lighting(intersector, hit.position, normal, &brdf, wo, rng);
        }

        let sample = brdf.sample(wo, normal, rng);
        if sample.pdf < MIN_PDF {
            break;
        }

        let cos_theta = normal.dot(sample.wi).max(0.0);
        throughput *= brdf.evaluate(sample.wi, wo, normal) * cos_theta / sample.pdf;

        if settings.enable_russian_roulette && bounce > RUSSIAN_ROULETTE_START {
            let survival = max_channel(throughput).min(1.0);
            if survival <= 0.0 || gen_f32(rng) > survival {
                break;
            }
            throughput /= survival;
        }

        if max_channel(throughput) < MIN_THROUGHPUT {
            break;
        }

        ray = Ray::new(hit.position + normal * SURFACE_EPSILON, sample.wi);
    }

    radiance
}
