use crate::animation::{Sample, Sampler};
use crate::scene::{Node, NodeIndex};

/// A keyframe track bound to a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub target: NodeIndex,
    pub sampler: Sampler,
}

/// A named set of channels played together.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Time of the last keyframe over all channels, in seconds.
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    /// Creates a clip, deriving its duration from the channels.
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let duration = channels
            .iter()
            .map(|c| c.sampler.end())
            .fold(0.0f32, f32::max);

        Self {
            name: name.into(),
            duration,
            channels,
        }
    }

    /// Writes the value of every channel at time `t` into the pose of its target node.
    ///
    /// Channels targeting a node that does not exist are skipped. Morph target
    /// weights are not part of a node pose and are dropped.
    pub fn sample_into(&self, t: f32, nodes: &mut [Node]) {
        for channel in &self.channels {
            let Some(node) = nodes.get_mut(channel.target) else {
                continue;
            };

            match channel.sampler.sample(t) {
                Sample::Translation(v) => node.pose.translation = v,
                Sample::Rotation(q) => node.pose.rotation = q,
                Sample::Scale(v) => node.pose.scale = v,
                Sample::Weights(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Interpolation, Keyframes};
    use crate::scene::Transform;
    use glamx::Vec3;

    fn slide(target: NodeIndex, end: f32) -> Channel {
        Channel {
            target,
            sampler: Sampler::new(
                vec![0.0, end],
                Keyframes::Translation(vec![Vec3::ZERO, Vec3::new(end, 0.0, 0.0)]),
                Interpolation::Linear,
            )
            .unwrap(),
        }
    }

    #[test]
    fn duration_is_the_last_key_time() {
        let clip = AnimationClip::new("walk", vec![slide(0, 1.0), slide(0, 2.5)]);
        assert_eq!(clip.duration, 2.5);
        assert_eq!(AnimationClip::new("empty", vec![]).duration, 0.0);
    }

    #[test]
    fn sampling_writes_node_poses() {
        let mut nodes = vec![Node::new(None, Transform::IDENTITY)];
        let clip = AnimationClip::new("walk", vec![slide(0, 2.0), slide(7, 2.0)]);

        clip.sample_into(1.0, &mut nodes);
        assert!((nodes[0].pose.translation - Vec3::X).length() < 1.0e-6);
        assert_eq!(nodes[0].rest, Transform::IDENTITY);
    }
}
