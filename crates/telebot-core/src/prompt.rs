use crate::mode::Mode;

/// Placeholder substituted with the user's text.
pub const PLACEHOLDER: &str = "{user_message}";

/// Immutable prompt template with exactly one `{user_message}` substitution point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub text: &'static str,
}

impl PromptTemplate {
    /// Substitute `user_text` into the placeholder.
    ///
    /// The user's text is inserted verbatim; braces inside it are never re-read as placeholders.
    pub fn render(&self, user_text: &str) -> String {
        self.text.replacen(PLACEHOLDER, user_text, 1)
    }
}

/// Daily log entries rewritten as natural spoken English.
pub const CONVERSATIONAL: PromptTemplate = PromptTemplate {
    name: "conversational",
    text: r#"You are helping Louis practice spoken English by converting his daily logs
into natural, conversational English he would actually say out loud.

CRITICAL: This is NOT translation. Generate how Louis would naturally express
these thoughts/events if speaking English casually to a friend.

Guidelines:
- Sound like real speech, not written text
- Keep it casual and natural (contractions, informal grammar OK)
- Preserve the tone and feeling of each entry
- Short entries can stay short ("Had beef brisket noodles yesterday")
- Context-dependent entries (like "36mg") can stay as-is if unclear
- Place names can be romanized or kept in Chinese as he would say them
- Match the original rhythm: short stays short, long stays long
- Preserve any timestamp header lines exactly as-is (e.g. "Life Logging, [2026/2/2 08:46]")
- Output one English entry per input entry, keep blank lines between entries
- Do NOT add new events or explanations

Daily logs:
{user_message}

Natural spoken English version:
"#,
};

/// One meaningful moment turned into a Topic / Context / Practice Dialogue drill.
pub const TOPIC_PRACTICE: PromptTemplate = PromptTemplate {
    name: "topic_practice",
    text: r#"请将以下日志转换成英文口语对话练习：

{user_message}

## 输出要求：

1. **从日志中选择 1 个最有意义的时刻**
   - 优先选择：有情感冲击、自我发现、或特别经历的时刻
   - 跳过：纯粹的时间记录、例行公事

2. **严格按照此格式输出**：

Topic: [描述性主题，3-6个词]

Context: [一句话背景说明]

Practice Dialogue:
A: "[根据情境的自然提问]"
B: "[你的口语回答，2-3句话，30-50字]"

## 重要规则：

**Topic 命名：**
- 描述性标题（例如：Wedding Design Opportunity, Family Dynamics Realization）
- 3-6个词
- 大写开头

**Context：**
- 一句话背景
- 简洁清晰
- 提供必要信息让 A 的问题make sense

**A 的问题（朋友提问）：**
- 根据不同情境变化问题
- 工作相关："How's the project going?" / "How'd the meeting go?"
- 社交相关："How'd it go with [person]?" / "What happened with...?"
- 心情/状态："You doing okay?" / "How you feeling about it?"
- 创作相关："How's the work coming along?"
- 必须自然、简短（5-10词）
- 像真实朋友会问的

**B 的回答（你的练习重点）：**
- 完全口语化风格
- 2-3句话
- 30-50字
- 带真实情感和个性

### 口语化规则（CRITICAL）：

1. **句子片段完全 OK**：
   ❌ "I reached out to him"
   ✅ "Reached out to him" / "Just reached out"

2. **日常词汇**：
   ❌ "initiated contact" → ✅ "reached out"
   ❌ "very engaged" → ✅ "totally into it"
   ❌ "felt tedious" → ✅ "boring me to death"

3. **情感词汇**：
   - 用 actually, pretty, really, totally, just
   - "Pretty good actually" / "Honestly..." / "Not gonna lie..."

4. **自然语流**：
   - 用破折号 (—) 连接想法
   - 自我中断："Took the initiative myself this time—just put myself out there."
   - 问答自己："We'll see what happens next though."

5. **避免书面语**：
   - 不要太完整的句子结构
   - 不要学术词汇
   - 不要 formal connectors

## 示例对比：

❌ **太正式**：
Topic: Professional Communication
Context: I contacted a colleague regarding potential collaboration
Practice Dialogue:
A: "How did your day go?"
B: "I successfully established contact with Jason to discuss a potential wedding design collaboration. I took the initiative to reach out independently."

✅ **正确风格**：
Topic: Wedding Design Opportunity
Context: Reached out to Jason about a potential wedding design project
Practice Dialogue:
A: "How'd things go with Jason today?"
B: "Pretty good actually. Reached out to him about doing some wedding design work. Took the initiative myself this time—just put myself out there. We'll see what happens next though."

**关键差异：**
- B 开头用口语回应："Pretty good actually"
- 句子片段："Reached out" 不是 "I reached out"
- 自然连接："this time—just put myself out there"
- 轻松结尾："We'll see what happens next though"

---

**最终检查：**
- Topic 是描述性的？✓
- Context 一句话？✓
- A 的问题根据情境变化？✓
- B 的回答 30-50 字？✓
- B 听起来像语音信息给朋友？✓

立即输出，不要任何额外说明。
"#,
};

pub fn template_for(mode: Mode) -> &'static PromptTemplate {
    match mode {
        Mode::Default => &CONVERSATIONAL,
        Mode::TopicPractice => &TOPIC_PRACTICE,
    }
}

/// Build the full prompt for `user_text` (already trimmed, non-empty) under `mode`.
pub fn build(mode: Mode, user_text: &str) -> String {
    template_for(mode).render(user_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_have_exactly_one_placeholder() {
        for t in [CONVERSATIONAL, TOPIC_PRACTICE] {
            assert_eq!(t.text.matches(PLACEHOLDER).count(), 1, "{}", t.name);
        }
    }

    #[test]
    fn default_mode_wraps_text_in_rewrite_instructions() {
        let prompt = build(Mode::Default, "Had noodles yesterday");
        assert!(prompt.contains("Had noodles yesterday"));
        assert!(prompt.contains("natural, conversational English"));
        assert!(prompt.contains("Natural spoken English version:"));
        assert!(!prompt.contains(PLACEHOLDER));
        assert!(prompt.len() > "Had noodles yesterday".len());
    }

    #[test]
    fn topic_mode_differs_structurally() {
        let text = "Reached out to Jason about a wedding design project";
        let topic = build(Mode::TopicPractice, text);
        let default = build(Mode::Default, text);

        assert!(topic.contains(text));
        assert!(topic.contains("Practice Dialogue:"));
        assert!(topic.contains("Context:"));
        assert!(!default.contains("Practice Dialogue:"));
        assert_ne!(topic, default);
    }

    #[test]
    fn user_braces_are_inserted_literally() {
        let prompt = build(Mode::Default, "literal {user_message} and {x}");
        assert!(prompt.contains("literal {user_message} and {x}"));
        assert_eq!(prompt.matches(PLACEHOLDER).count(), 1);
    }

    #[test]
    fn template_selection_follows_mode() {
        assert_eq!(template_for(Mode::Default).name, "conversational");
        assert_eq!(template_for(Mode::TopicPractice).name, "topic_practice");
    }
}
