mod db_test;
pub use db_test::{DbTest, SCHEMA};

mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver, OpLog};

/// Install `env_logger` once; set `RUST_LOG=batis=debug` to see the SQL each
/// test sends.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Statements over the `users` and `tags` tables.
pub const USERS_MAPPER: &str = r#"
<mapper>
    <sql id="columns">id, user_name, email, age, street, city, created_at, deleted_at</sql>

    <select id="findUser">
        SELECT <include refid="columns"/> FROM users WHERE id = #{id}
    </select>

    <select id="listUsers">
        SELECT <include refid="columns"/> FROM users
        <where>
            <if test="name != nil">AND user_name = #{name}</if>
            <if test="min_age != nil">AND age >= #{min_age}</if>
        </where>
        ORDER BY id
    </select>

    <select id="usersByIds">
        SELECT id, user_name FROM users WHERE id IN (#{ids}) ORDER BY id
    </select>

    <select id="usersOrdered">
        SELECT id, user_name FROM users ORDER BY
        <choose>
            <when test="by == 'age'">age DESC</when>
            <otherwise>id</otherwise>
        </choose>
    </select>

    <select id="countUsers">SELECT count(*) AS total FROM users</select>

    <insert id="addUser">
        INSERT INTO users (user_name, email, age, created_at)
        VALUES (#{name}, #{email}, #{age}, #{created_at})
    </insert>

    <insert id="addTags">
        INSERT INTO tags (user_id, tag) VALUES
        <foreach collection="tags" item="tag" separator=",">(#{user_id}, #{tag})</foreach>
    </insert>

    <update id="updateUser">
        UPDATE users
        <trim prefix="SET" prefixOverrides=",">
            <if test="email != nil">, email = #{email}</if>
            <if test="age != nil">, age = #{age}</if>
        </trim>
        WHERE id = #{id}
    </update>

    <delete id="deleteUser">DELETE FROM users WHERE id = #{id}</delete>
</mapper>
"#;
