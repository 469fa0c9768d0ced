use crate::animation::{AnimationClip, ClipAction, Clock};
use crate::scene::Model;

/// Plays animation clips on a model.
///
/// The mixer owns the clips and the actions currently running. Starting a
/// clip with [`AnimationMixer::play`] replaces whatever was running, so at
/// most one clip animates the model at a time.
///
/// # Example
/// ```
/// # use clipview::animation::{AnimationClip, AnimationMixer};
/// let mut mixer = AnimationMixer::new(vec![AnimationClip::new("Samba", vec![])]);
/// assert!(mixer.play("Samba"));
/// assert!(!mixer.play("Tango"));
/// assert_eq!(mixer.current_clip(), Some("Samba"));
/// ```
#[derive(Clone, Debug)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    actions: Vec<ClipAction>,
    current: Option<String>,
    clock: Clock,
}

impl AnimationMixer {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self {
            clips,
            actions: Vec::new(),
            current: None,
            clock: Clock::new(),
        }
    }

    #[inline]
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// The actions currently running.
    #[inline]
    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }

    #[inline]
    pub fn actions_mut(&mut self) -> &mut [ClipAction] {
        &mut self.actions
    }

    /// The name of the clip last started by [`AnimationMixer::play`].
    #[inline]
    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Stops every running action and starts the clip named `name` from its beginning.
    ///
    /// If no clip has that name nothing changes: the running actions keep
    /// playing and the current clip stays the same. Returns whether the clip
    /// was found.
    pub fn play(&mut self, name: &str) -> bool {
        let Some(clip) = self.clips.iter().position(|c| c.name == name) else {
            log::warn!("No animation clip named {name:?}.");
            return false;
        };

        self.stop_all_actions();
        self.actions.push(ClipAction::new(clip));
        self.current = Some(name.to_string());
        log::info!("Playing animation clip {name:?}.");
        true
    }

    /// Stops every running action. The current clip name is kept.
    pub fn stop_all_actions(&mut self) {
        self.actions.clear();
    }

    /// Advances the running actions by the time elapsed since the previous update.
    pub fn update(&mut self) {
        let delta = self.clock.get_delta();
        self.advance(delta);
    }

    /// Advances the running actions by `delta` seconds.
    pub fn advance(&mut self, delta: f32) {
        for action in &mut self.actions {
            let duration = self.clips.get(action.clip).map_or(0.0, |c| c.duration);
            action.advance(delta, duration);
        }
    }

    /// Poses `model` according to the running actions.
    ///
    /// Nodes go back to their rest transform first, so nodes no running clip
    /// animates are not left in a stale pose.
    pub fn apply(&self, model: &mut Model) {
        model.reset_pose();
        for action in &self.actions {
            if let Some(clip) = self.clips.get(action.clip) {
                clip.sample_into(action.time, &mut model.nodes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Channel, Interpolation, Keyframes, LoopMode, Sampler};
    use crate::scene::{Node, Transform};
    use glamx::Vec3;

    fn clip(name: &str, target: usize, duration: f32) -> AnimationClip {
        AnimationClip::new(
            name,
            vec![Channel {
                target,
                sampler: Sampler::new(
                    vec![0.0, duration],
                    Keyframes::Translation(vec![Vec3::ZERO, Vec3::new(duration, 0.0, 0.0)]),
                    Interpolation::Linear,
                )
                .unwrap(),
            }],
        )
    }

    fn mixer() -> AnimationMixer {
        AnimationMixer::new(vec![
            clip("CatWalk", 0, 2.0),
            clip("Samba", 1, 4.0),
            clip("Belly", 0, 1.0),
        ])
    }

    fn model() -> Model {
        Model {
            nodes: vec![
                Node::new(None, Transform::IDENTITY),
                Node::new(None, Transform::from_translation(Vec3::Y)),
            ],
            roots: vec![0, 1],
            ..Default::default()
        }
    }

    #[test]
    fn play_replaces_running_actions() {
        let mut mixer = mixer();
        assert!(mixer.play("CatWalk"));
        mixer.advance(0.5);
        assert!(mixer.play("Samba"));

        assert_eq!(mixer.actions().len(), 1);
        assert_eq!(mixer.actions()[0].clip, 1);
        assert_eq!(mixer.actions()[0].time, 0.0);
        assert_eq!(mixer.current_clip(), Some("Samba"));
    }

    #[test]
    fn playing_an_unknown_clip_changes_nothing() {
        let mut mixer = mixer();
        mixer.play("CatWalk");
        mixer.advance(0.5);
        let before = mixer.actions().to_vec();

        assert!(!mixer.play("Tango"));
        assert_eq!(mixer.actions(), &before[..]);
        assert_eq!(mixer.current_clip(), Some("CatWalk"));
    }

    #[test]
    fn replaying_the_current_clip_restarts_it() {
        let mut mixer = mixer();
        mixer.play("CatWalk");
        mixer.advance(1.5);
        mixer.play("CatWalk");
        assert_eq!(mixer.actions()[0].time, 0.0);
    }

    #[test]
    fn advance_loops_over_the_clip_duration() {
        let mut mixer = mixer();
        mixer.play("CatWalk");
        mixer.advance(2.5);
        assert!((mixer.actions()[0].time - 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn stop_keeps_the_current_name() {
        let mut mixer = mixer();
        mixer.play("Belly");
        mixer.stop_all_actions();
        assert!(mixer.actions().is_empty());
        assert_eq!(mixer.current_clip(), Some("Belly"));
    }

    #[test]
    fn apply_resets_nodes_the_new_clip_does_not_drive() {
        let mut mixer = mixer();
        let mut model = model();

        mixer.play("Samba");
        mixer.advance(2.0);
        mixer.apply(&mut model);
        assert!((model.nodes[1].pose.translation - Vec3::new(2.0, 0.0, 0.0)).length() < 1.0e-5);

        mixer.play("CatWalk");
        mixer.advance(1.0);
        mixer.apply(&mut model);
        assert_eq!(model.nodes[1].pose.translation, Vec3::Y);
        assert!((model.nodes[0].pose.translation - Vec3::X).length() < 1.0e-5);
    }

    #[test]
    fn once_actions_hold_the_last_pose() {
        let mut mixer = mixer();
        let mut model = model();

        mixer.play("CatWalk");
        mixer.actions_mut()[0].loop_mode = LoopMode::Once;

        mixer.advance(1.5);
        mixer.apply(&mut model);
        assert!(!mixer.actions()[0].is_finished());
        assert!((model.nodes[0].pose.translation - Vec3::new(1.5, 0.0, 0.0)).length() < 1.0e-5);

        mixer.advance(1.0);
        mixer.apply(&mut model);
        assert!(mixer.actions()[0].is_finished());
        assert_eq!(mixer.actions()[0].time, 2.0);
        assert!((model.nodes[0].pose.translation - Vec3::new(2.0, 0.0, 0.0)).length() < 1.0e-5);

        mixer.advance(3.0);
        mixer.apply(&mut model);
        assert_eq!(mixer.actions()[0].time, 2.0);
        assert!((model.nodes[0].pose.translation - Vec3::new(2.0, 0.0, 0.0)).length() < 1.0e-5);
    }

    #[test]
    fn no_clip_plays_before_the_first_play() {
        let mut mixer = mixer();
        mixer.update();
        assert_eq!(mixer.current_clip(), None);
        assert!(mixer.actions().is_empty());
    }
}
